//! `mimetree`: a strict RFC 822 / MIME message parser.
//!
//! Messages are parsed into an immutable tree: folded headers with
//! structured parameters, and either literal body lines or, for `multipart/*`
//! content, the recursively parsed body parts between boundary delimiters.
//!
//! ```
//! let msg = mimetree::parse_str(
//!     "Content-Type: text/plain; charset=\"us-ascii\"\r\n\r\nHello\r\n",
//! )
//! .unwrap();
//! let ct = msg.header("content-type").unwrap();
//! assert_eq!(ct.value_without_parameters(), "text/plain");
//! assert_eq!(ct.parameters()["charset"], "us-ascii");
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;

pub use error::{MalformedKind, MimeError, Result};
pub use model::field::StructuredField;
pub use model::header::{Header, Headers};
pub use model::message::{Line, Message, MultipartMessage, SimpleMessage};
pub use parser::{parse, parse_file, parse_str, Input, MessageParser, ParseOptions};
pub use registry::{MediaType, MediaTypeRegistry, TypeRegistry};
