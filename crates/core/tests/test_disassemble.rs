//! Integration tests for disassemble functionality.

#[cfg(test)]
mod integration_tests {
    use hugin_disassemble::{
        analyze, decode, decode_hex_lossy, disassemble, DisassemblerArgsBuilder,
    };

    #[test]
    fn test_disassemble_nominal() {
        let bytecode = "366000600037611000600036600073";
        let expected = String::from("000000 CALLDATASIZE \n000001 PUSH1 00\n000003 PUSH1 00\n000005 CALLDATACOPY \n000006 PUSH2 1000\n000009 PUSH1 00\n00000b CALLDATASIZE \n00000c PUSH1 00\n");

        let assembly = disassemble(
            DisassemblerArgsBuilder::new()
                .target(bytecode.to_owned())
                .build()
                .expect("failed to build args"),
        )
        .expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_decimal_counter_nominal() {
        let bytecode = "366000600037611000600036600073";
        let expected = String::from("0 CALLDATASIZE \n1 PUSH1 00\n3 PUSH1 00\n5 CALLDATACOPY \n6 PUSH2 1000\n9 PUSH1 00\n11 CALLDATASIZE \n12 PUSH1 00\n");

        let assembly = disassemble(
            DisassemblerArgsBuilder::new()
                .target(bytecode.to_owned())
                .decimal_counter(true)
                .build()
                .expect("failed to build args"),
        )
        .expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_with_prefix() {
        let with_prefix = disassemble(
            DisassemblerArgsBuilder::new()
                .target("0x366000600037".to_owned())
                .build()
                .expect("failed to build args"),
        )
        .expect("failed to disassemble");
        let without_prefix = disassemble(
            DisassemblerArgsBuilder::new()
                .target("366000600037".to_owned())
                .build()
                .expect("failed to build args"),
        )
        .expect("failed to disassemble");

        assert_eq!(with_prefix, without_prefix);
    }

    #[test]
    fn test_push_length_invariant() {
        // exactly one PUSH4 with a 4-byte immediate, then STOP
        let instructions = decode(&decode_hex_lossy("63aabbccdd00"));
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].mnemonic, "PUSH4");
        assert_eq!(instructions[0].immediate.as_deref(), Some(&[0xaa, 0xbb, 0xcc, 0xdd][..]));
        assert_eq!(instructions[1].mnemonic, "STOP");
    }

    #[test]
    fn test_unknown_opcodes_do_not_abort() {
        let analysis = analyze("0xef0cfe00");
        assert_eq!(analysis.instructions.len(), 4);
        assert_eq!(analysis.instructions[0].mnemonic, "UNKNOWN(0xef)");
        assert_eq!(analysis.instructions[3].mnemonic, "STOP");
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let bytecode = "0x6080604052348015600f57600080fd5b5063a9059cbb14610040575b";
        let first = analyze(bytecode);
        let second = analyze(bytecode);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sentinel_selectors_never_extracted() {
        let analysis = analyze("0x6300000000146100405763ffffffff1461004057");
        assert!(analysis.selectors.is_empty());
    }
}
