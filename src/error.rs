use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! config_error {
    ($msg:expr) => {
        crate::Error::Config($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Config(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy mirrors the three failure classes of the rewriting layer: input that does not
/// decode ([`Error::Malformed`], [`Error::OutOfBounds`]), input that decodes but is disallowed
/// by a transformation stage ([`Error::Rejected`]), and inconsistent engine configuration
/// detected before any class is processed ([`Error::Config`]).
///
/// # Examples
///
/// ```rust
/// use classweave::{ClassUnit, Error};
///
/// match ClassUnit::from_bytes(&[0xFF, 0xFF]) {
///     Ok(unit) => println!("Decoded {}", unit.name),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed input: {} ({}:{})", message, file, line);
///     }
///     Err(Error::OutOfBounds) => eprintln!("Truncated input"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be decoded into the class-unit model.
    ///
    /// This error indicates that the byte stream does not conform to the symbolic
    /// class-unit format (bad magic, unsupported version, inconsistent counts,
    /// unparsable descriptors). The error includes the source location where the
    /// malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding the input.
    ///
    /// This error occurs when trying to read data beyond the end of the input
    /// buffer. Truncation is the most common shape of adversarial input, so it
    /// is kept distinct from [`Error::Malformed`].
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// A transformation stage recognized the class as structurally valid but
    /// semantically disallowed.
    ///
    /// The rewrite of the whole class unit is abandoned the moment this is
    /// raised; no partially rewritten output is ever observable.
    ///
    /// # Fields
    ///
    /// * `class` - Fully-qualified symbol of the offending class
    /// * `context` - Method and instruction the rejection points at, when known
    /// * `message` - Diagnostic for the deployment-acceptance collaborator
    #[error("Rejected {class} ({context}): {message}")]
    Rejected {
        /// Fully-qualified symbol of the offending class
        class: String,
        /// Method and instruction context of the rejection
        context: String,
        /// Diagnostic message describing the violated policy
        message: String,
    },

    /// The toolchain configuration is internally inconsistent.
    ///
    /// Covers remap-rule key collisions, overlapping API-surface prefixes, and
    /// stage orderings that violate a declared invariant dependency. Detected
    /// eagerly at construction time, before any class is processed; fatal to
    /// engine startup and never raised per-request.
    #[error("Configuration - {0}")]
    Config(String),
}

/// Standard result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
