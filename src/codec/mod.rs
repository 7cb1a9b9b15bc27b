//! Reading and writing the BalkaNet/VisDic XML dialect.
//!
//! ## Key Components
//!
//! - [`reader`]: pull parser turning a document into a [`Lexicon`](crate::lexicon::Lexicon)
//!   ([`load`], [`load_with`], [`load_file`])
//! - [`writer`]: renders synsets back to XML ([`write_synset`], [`write_lexicon`])
//! - [`LoadDiagnostic`]: non-fatal inconsistencies found while loading
//!
//! ## Document shape
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE WNXML SYSTEM "wnxml.dtd">
//! <WNXML>
//! <SYNSET><ID>ENG20-02084071-n</ID><POS>n</POS><SYNONYM><LITERAL>dog<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>ENG20-02083346-n<TYPE>hypernym</TYPE></ILR><DEF>a member of the genus Canis</DEF></SYNSET>
//! </WNXML>
//! ```
//!
//! The `WNXML` root may be missing; older VisDic exports are a bare sequence of `SYNSET`s.
//!
//! ```rust
//! use wnxml::codec::{load, write_synset};
//!
//! let lexicon = load("<SYNSET><ID>X</ID><POS>n</POS></SYNSET>").unwrap();
//! let xml = write_synset(lexicon.get_synset("X").unwrap()).unwrap();
//! assert_eq!(xml, "<SYNSET><ID>X</ID><POS>n</POS><SYNONYM></SYNONYM></SYNSET>");
//! ```

pub mod diagnostic;
pub mod reader;
pub mod writer;

pub use diagnostic::LoadDiagnostic;
pub use reader::{load, load_file, load_with, LoadOptions};
pub use writer::{
    escape_text, write_footer, write_header, write_lexicon, write_synset, write_synsets,
};
