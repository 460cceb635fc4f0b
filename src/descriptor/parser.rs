use crate::{
    descriptor::{MethodDescriptor, TypeDescriptor},
    Result,
};

/// Maximum array nesting accepted in a descriptor
const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Parse the text form of a method descriptor into its structured value.
///
/// The whole input must be consumed; trailing characters are malformed input.
/// `void` is accepted only in return position.
///
/// # Example
///
/// ```rust
/// use classweave::descriptor::{parse_method_descriptor, TypeDescriptor};
///
/// let descriptor = parse_method_descriptor("(Lw/_Lp/score/Value;I)V")?;
/// assert_eq!(descriptor.params[1], TypeDescriptor::Int);
/// # Ok::<(), classweave::Error>(())
/// ```
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the text is not a valid method
/// descriptor.
pub fn parse_method_descriptor(text: &str) -> Result<MethodDescriptor> {
    let mut parser = DescriptorParser::new(text);
    let descriptor = parser.parse_method()?;
    parser.expect_end()?;
    Ok(descriptor)
}

/// Parse the text form of a field or parameter type descriptor.
///
/// `void` is rejected; a field cannot have type void.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the text is not a valid type
/// descriptor.
pub fn parse_type_descriptor(text: &str) -> Result<TypeDescriptor> {
    let mut parser = DescriptorParser::new(text);
    let descriptor = parser.parse_type(false)?;
    parser.expect_end()?;
    Ok(descriptor)
}

/// Cursor over descriptor text.
///
/// Descriptor syntax is ASCII at every structural position, so the cursor walks
/// bytes; class symbols between `L` and `;` are carried over verbatim as UTF-8.
struct DescriptorParser<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(text: &'a str) -> Self {
        DescriptorParser { text, position: 0 }
    }

    fn next_byte(&mut self) -> Result<u8> {
        match self.text.as_bytes().get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(malformed_error!(
                "Truncated descriptor '{}' at offset {}",
                self.text,
                self.position
            )),
        }
    }

    fn expect_end(&self) -> Result<()> {
        if self.position == self.text.len() {
            Ok(())
        } else {
            Err(malformed_error!(
                "Trailing characters in descriptor '{}' at offset {}",
                self.text,
                self.position
            ))
        }
    }

    fn parse_method(&mut self) -> Result<MethodDescriptor> {
        if self.next_byte()? != b'(' {
            return Err(malformed_error!(
                "Method descriptor '{}' does not start with '('",
                self.text
            ));
        }

        let mut params = Vec::new();
        loop {
            match self.text.as_bytes().get(self.position) {
                Some(b')') => {
                    self.position += 1;
                    break;
                }
                Some(_) => params.push(self.parse_type(false)?),
                None => {
                    return Err(malformed_error!(
                        "Unterminated parameter list in descriptor '{}'",
                        self.text
                    ))
                }
            }
        }

        let ret = self.parse_type(true)?;
        Ok(MethodDescriptor { params, ret })
    }

    fn parse_type(&mut self, allow_void: bool) -> Result<TypeDescriptor> {
        match self.next_byte()? {
            b'V' if allow_void => Ok(TypeDescriptor::Void),
            b'Z' => Ok(TypeDescriptor::Boolean),
            b'B' => Ok(TypeDescriptor::Byte),
            b'C' => Ok(TypeDescriptor::Char),
            b'S' => Ok(TypeDescriptor::Short),
            b'I' => Ok(TypeDescriptor::Int),
            b'J' => Ok(TypeDescriptor::Long),
            b'F' => Ok(TypeDescriptor::Float),
            b'D' => Ok(TypeDescriptor::Double),
            b'L' => self.parse_object(),
            b'[' => self.parse_array(),
            other => Err(malformed_error!(
                "Unsupported type tag '{}' in descriptor '{}'",
                char::from(other),
                self.text
            )),
        }
    }

    fn parse_object(&mut self) -> Result<TypeDescriptor> {
        let start = self.position;
        loop {
            match self.next_byte()? {
                b';' => break,
                _ => continue,
            }
        }

        let symbol = &self.text[start..self.position - 1];
        if symbol.is_empty() {
            return Err(malformed_error!(
                "Empty class symbol in descriptor '{}'",
                self.text
            ));
        }

        Ok(TypeDescriptor::Object(symbol.to_string()))
    }

    fn parse_array(&mut self) -> Result<TypeDescriptor> {
        // One '[' is already consumed by the caller
        let mut dimensions = 1;
        while self.text.as_bytes().get(self.position) == Some(&b'[') {
            self.position += 1;
            dimensions += 1;
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(malformed_error!(
                    "More than {} array dimensions in descriptor '{}'",
                    MAX_ARRAY_DIMENSIONS,
                    self.text
                ));
            }
        }

        let mut component = self.parse_type(false)?;
        for _ in 0..dimensions {
            component = TypeDescriptor::Array(Box::new(component));
        }
        Ok(component)
    }
}
