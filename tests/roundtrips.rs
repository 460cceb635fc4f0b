//! Integration tests for lossless decode/re-encode of class units.
//!
//! These tests exercise the public API end to end: bytes in, model, toolchain,
//! bytes out. The reproducibility guarantee - identical model, identical bytes -
//! is what makes the pipeline's output auditable, so it is pinned down here
//! against crafted units covering every construct the wire format supports.

use classweave::prelude::*;

/// A class unit whose symbols are already in sandbox form, as a later pipeline
/// stage would see it.
fn sandboxed_unit() -> ClassUnit {
    ClassUnit {
        name: "u/com/example/Token".to_string(),
        super_name: "s/java/lang/Object".to_string(),
        interfaces: vec![
            "u/com/example/Transferable".to_string(),
            "s/java/lang/Comparable".to_string(),
        ],
        fields: vec![
            FieldUnit {
                flags: AccessFlags::from_wire(0x0002),
                name: "balances".to_string(),
                descriptor: TypeDescriptor::object("s/java/util/Map"),
            },
            FieldUnit {
                // Unassigned high bits must survive the round trip
                flags: AccessFlags::from_wire(0x8019),
                name: "decimals".to_string(),
                descriptor: TypeDescriptor::Byte,
            },
        ],
        methods: vec![
            MethodUnit {
                flags: AccessFlags::from_wire(0x0001),
                name: "transfer".to_string(),
                descriptor: parse_method_descriptor("(Lp/score/Address;J)Z").unwrap(),
                instructions: vec![
                    Instruction::Other {
                        opcode: 0x2A,
                        operands: vec![],
                    },
                    Instruction::Call(CallSite {
                        dispatch: DispatchKind::Static,
                        owner: "p/score/Context".to_string(),
                        name: "avm_log".to_string(),
                        descriptor: parse_method_descriptor(
                            "(Lw/_Lp/score/Value;Lw/_Lp/score/Value;)V",
                        )
                        .unwrap(),
                        owner_is_interface: false,
                    }),
                    Instruction::Call(CallSite {
                        dispatch: DispatchKind::Interface,
                        owner: "s/java/util/Map".to_string(),
                        name: "avm_get".to_string(),
                        descriptor: parse_method_descriptor(
                            "(Ls/java/lang/Object;)Ls/java/lang/Object;",
                        )
                        .unwrap(),
                        owner_is_interface: true,
                    }),
                    Instruction::Other {
                        opcode: 0x12,
                        operands: vec![0x00, 0x07],
                    },
                    Instruction::Other {
                        opcode: 0xAC,
                        operands: vec![],
                    },
                ],
            },
            MethodUnit {
                flags: AccessFlags::from_wire(0x0008),
                name: "total".to_string(),
                descriptor: parse_method_descriptor("()[[J").unwrap(),
                instructions: vec![],
            },
        ],
    }
}

/// The default three-stage pipeline, with an empty remap table.
fn empty_table_toolchain() -> Toolchain {
    let shadow_map = ShadowMap::builder()
        .prefix("java/", "s/java/")
        .prefix("score/", "p/score/")
        .build()
        .unwrap();

    Toolchain::builder()
        .stage(Box::new(CallPolicyStage::new(
            &["java/", "javax/", "jdk/", "sun/"],
            &["java/lang/", "java/util/", "java/math/"],
        )))
        .stage(Box::new(ShadowNamespaceStage::new(shadow_map, "u/")))
        .stage(Box::new(ApiRemapStage::new(RemapRuleTable::empty())))
        .build()
        .unwrap()
}

#[test]
fn test_decode_encode_inverse() -> Result<()> {
    let unit = sandboxed_unit();
    let bytes = unit.to_bytes()?;

    let decoded = ClassUnit::from_bytes(&bytes)?;
    assert_eq!(decoded, unit);
    assert_eq!(decoded.to_bytes()?, bytes);
    Ok(())
}

#[test]
fn test_empty_toolchain_round_trip_byte_identical() -> Result<()> {
    // No stages at all: decode and re-encode must reproduce the input exactly.
    let toolchain = Toolchain::builder().build()?;
    let bytes = sandboxed_unit().to_bytes()?;

    let unit = ClassUnit::from_bytes(&bytes)?;
    let output = toolchain.run(unit, &TransformReport::new())?;
    assert_eq!(output.to_bytes()?, bytes);
    Ok(())
}

#[test]
fn test_empty_rule_table_round_trip_byte_identical() -> Result<()> {
    // The full pipeline with an empty remap table is the identity on a unit
    // whose symbols are already in sandbox form.
    let toolchain = empty_table_toolchain();
    let bytes = sandboxed_unit().to_bytes()?;

    let unit = ClassUnit::from_bytes(&bytes)?;
    let report = TransformReport::new();
    let output = toolchain.run(unit, &report)?;

    assert_eq!(output.to_bytes()?, bytes);
    assert!(report.is_empty());
    Ok(())
}

#[test]
fn test_sequence_preserved_through_pipeline() -> Result<()> {
    let toolchain = empty_table_toolchain();
    let unit = sandboxed_unit();
    let before: Vec<usize> = unit
        .methods
        .iter()
        .map(|method| method.instructions.len())
        .collect();

    let output = toolchain.run(unit, &TransformReport::new())?;
    let after: Vec<usize> = output
        .methods
        .iter()
        .map(|method| method.instructions.len())
        .collect();

    assert_eq!(before, after);
    Ok(())
}

#[test]
fn test_truncated_input_rejected() {
    let bytes = sandboxed_unit().to_bytes().unwrap();

    for cut in 0..bytes.len() {
        let result = ClassUnit::from_bytes(&bytes[..cut]);
        assert!(
            matches!(result, Err(Error::OutOfBounds | Error::Malformed { .. })),
            "prefix of {cut} bytes must not decode"
        );
    }
}

#[test]
fn test_garbage_input_rejected() {
    let inputs: Vec<Vec<u8>> = vec![
        vec![],
        vec![0x00],
        vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x01],
        vec![0xFF; 64],
    ];
    for input in inputs {
        assert!(ClassUnit::from_bytes(&input).is_err());
    }
}

#[test]
fn test_mutated_input_never_panics() {
    // Flip each byte of a valid encoding; every mutation either still decodes
    // (into some unit) or fails cleanly, but must never corrupt silently into
    // a unit that re-encodes differently from what it decoded from.
    let bytes = sandboxed_unit().to_bytes().unwrap();

    for position in 0..bytes.len() {
        let mut mutated = bytes.clone();
        mutated[position] ^= 0xFF;

        if let Ok(unit) = ClassUnit::from_bytes(&mutated) {
            assert_eq!(
                unit.to_bytes().unwrap(),
                mutated,
                "byte {position}: decode accepted a mutation it cannot reproduce"
            );
        }
    }
}
