//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; later calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A small Hungarian noun hierarchy in VisDic XML.
///
/// - `kutya` has two senses (`HUN-1` dog, `HUN-2` scoundrel)
/// - `HUN-1 -> HUN-3 -> HUN-4` along hypernym, `HUN-2 -> HUN-5 -> HUN-4`
/// - `HUN-6` points at the missing `HUN-99`
/// - hyponym edges are left to relation inversion
#[allow(dead_code)]
pub const WORDNET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WNXML SYSTEM "wnxml.dtd">
<WNXML>
<SYNSET><ID>HUN-1</ID><ID3>ENG30-02084071-n</ID3><POS>n</POS><SYNONYM><LITERAL>kutya<SENSE>1</SENSE></LITERAL><LITERAL>eb<SENSE>1</SENSE><LNOTE>régies</LNOTE></LITERAL></SYNONYM><ILR>HUN-3<TYPE>hypernym</TYPE></ILR><DEF>négylábú háziállat</DEF><BCS>1</BCS><USAGE>A kutya ugat.</USAGE><SUMO>Canine<TYPE>+</TYPE></SUMO><ELR>ENG20-02001223-n<TYPE>eq_near_synonym</TYPE></ELR></SYNSET>
<SYNSET><ID>HUN-2</ID><POS>n</POS><SYNONYM><LITERAL>kutya<SENSE>2</SENSE></LITERAL><LITERAL>gazember<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>HUN-5<TYPE>hypernym</TYPE></ILR><DEF>aljas ember</DEF></SYNSET>
<SYNSET><ID>HUN-3</ID><POS>n</POS><SYNONYM><LITERAL>kutyaféle<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>HUN-4<TYPE>hypernym</TYPE></ILR><DEF>ragadozó emlős</DEF></SYNSET>
<SYNSET><ID>HUN-4</ID><POS>n</POS><SYNONYM><LITERAL>élőlény<SENSE>1</SENSE></LITERAL></SYNONYM><DEF>élő szervezet</DEF></SYNSET>
<SYNSET><ID>HUN-5</ID><POS>n</POS><SYNONYM><LITERAL>ember<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>HUN-4<TYPE>hypernym</TYPE></ILR></SYNSET>
<SYNSET><ID>HUN-6</ID><POS>v</POS><SYNONYM><LITERAL>ugat<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>HUN-99<TYPE>also_see</TYPE></ILR><DEF>kutya hangot ad</DEF></SYNSET>
</WNXML>
"#;

/// Semantic features for [WORDNET].
#[allow(dead_code)]
pub const FEATURES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<semfeatures>
  <semfeature name="animate"><synset id="HUN-4"/></semfeature>
  <semfeature name="human"><synset id="HUN-5"/></semfeature>
</semfeatures>
"#;

/// Write `content` as `name` into `temp_dir` and return its path.
#[allow(dead_code)]
pub fn write_file(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
