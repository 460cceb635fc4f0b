use bitflags::bitflags;

bitflags! {
    /// Access and property flags of a class, field, or method.
    ///
    /// The numeric values follow the compiled-class convention the loader
    /// emits. Unknown bits are retained verbatim (`from_bits_retain`) so that
    /// unmodified units re-encode byte-identically even when they carry flags
    /// this layer does not interpret.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        /// Accessible outside its package
        const PUBLIC = 0x0001;
        /// Accessible only within its class
        const PRIVATE = 0x0002;
        /// Accessible within its package and subclasses
        const PROTECTED = 0x0004;
        /// Class member, no receiver
        const STATIC = 0x0008;
        /// No overriding / no reassignment
        const FINAL = 0x0010;
        /// Declared as an interface
        const INTERFACE = 0x0200;
        /// No implementation provided here
        const ABSTRACT = 0x0400;
        /// Compiler-generated, not present in source
        const SYNTHETIC = 0x1000;
    }
}

impl AccessFlags {
    /// Decode flags from their wire value, keeping unrecognized bits.
    #[must_use]
    pub fn from_wire(value: u16) -> Self {
        AccessFlags::from_bits_retain(value)
    }

    /// The wire value, including any retained unrecognized bits.
    #[must_use]
    pub fn to_wire(self) -> u16 {
        self.bits()
    }
}
