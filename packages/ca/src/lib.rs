//! Certificate authority primitives
//!
//! Key-pair parsing, self-signed and endorsed X.509 certificate construction,
//! subject alternative name parsing and X.509 validity-time helpers. All
//! cryptography is delegated to `rcgen`; this crate only shapes parameters and
//! reports failures through [`CaError`].

pub mod certs;
pub mod error;
pub mod key_pair;
pub mod name;
pub mod san;
pub mod validity;

pub use certs::{create_endorsed_cert, create_self_signed_cert, Pem};
pub use error::{CaError, Result};
pub use key_pair::{make_key_pair, KeyPair};
pub use name::parse_subject_name;
pub use san::{sans_from_string_list, SubjectAltName};
pub use validity::{compute_cert_valid_to_string, parse_x509_time_string, to_x509_time_string};
