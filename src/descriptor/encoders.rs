//! Dedicated descriptor encoders for the canonical text form.
//!
//! The encoders are the exact inverse of the parsers in
//! [`crate::descriptor::parser`]: every structured descriptor has one and only
//! one text rendering, which keeps re-encoded class units reproducible for
//! auditing.

use crate::descriptor::{MethodDescriptor, TypeDescriptor};

/// Render a type descriptor into its canonical text form.
#[must_use]
pub fn format_type_descriptor(descriptor: &TypeDescriptor) -> String {
    let mut buffer = String::new();
    encode_type(descriptor, &mut buffer);
    buffer
}

/// Render a method descriptor into its canonical text form.
///
/// # Example
///
/// ```rust
/// use classweave::descriptor::{format_method_descriptor, parse_method_descriptor};
///
/// let text = "(Li/IObjectArray;Li/IObjectArray;)V";
/// let descriptor = parse_method_descriptor(text)?;
/// assert_eq!(format_method_descriptor(&descriptor), text);
/// # Ok::<(), classweave::Error>(())
/// ```
#[must_use]
pub fn format_method_descriptor(descriptor: &MethodDescriptor) -> String {
    let mut buffer = String::new();
    buffer.push('(');
    for param in &descriptor.params {
        encode_type(param, &mut buffer);
    }
    buffer.push(')');
    encode_type(&descriptor.ret, &mut buffer);
    buffer
}

fn encode_type(descriptor: &TypeDescriptor, buffer: &mut String) {
    match descriptor {
        TypeDescriptor::Void => buffer.push('V'),
        TypeDescriptor::Boolean => buffer.push('Z'),
        TypeDescriptor::Byte => buffer.push('B'),
        TypeDescriptor::Char => buffer.push('C'),
        TypeDescriptor::Short => buffer.push('S'),
        TypeDescriptor::Int => buffer.push('I'),
        TypeDescriptor::Long => buffer.push('J'),
        TypeDescriptor::Float => buffer.push('F'),
        TypeDescriptor::Double => buffer.push('D'),
        TypeDescriptor::Object(symbol) => {
            buffer.push('L');
            buffer.push_str(symbol);
            buffer.push(';');
        }
        TypeDescriptor::Array(component) => {
            buffer.push('[');
            encode_type(component, buffer);
        }
    }
}
