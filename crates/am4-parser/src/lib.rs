pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use am4_lexer::Lexer;
    use am4_syntax::ast::*;
    use am4_syntax::error::{Error, ErrorKind};

    fn parse_program_str(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    fn parse_err(input: &str) -> Error {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect_err("Parsing should fail")
    }

    fn ops(p: &Program) -> Vec<(Opcode, Operand)> {
        p.instructions.iter().map(|i| (i.opcode, i.operand.clone())).collect()
    }

    #[test]
    fn test_zero_operand_statements() {
        let p = parse_program_str("noop\nadd\nsub\nmul\neq\nlt\nle\ngt\nge\nland\nlor\nlneg\n");
        assert_eq!(p.instructions.len(), 12);
        assert!(p.instructions.iter().all(|i| i.operand == Operand::None));
        assert_eq!(p.instructions[11].opcode, Opcode::LNeg);
    }

    #[test]
    fn test_literal_operands() {
        let p = parse_program_str("push 5\npush -3\npush true\nprintc false\nprintc 9\n");
        assert_eq!(
            ops(&p),
            vec![
                (Opcode::Push, Operand::Int(5)),
                (Opcode::Push, Operand::Int(-3)),
                (Opcode::Push, Operand::Bool(true)),
                (Opcode::PrintC, Operand::Bool(false)),
                (Opcode::PrintC, Operand::Int(9)),
            ]
        );
    }

    #[test]
    fn test_store_defines_identifiers_in_order() {
        let p = parse_program_str("push 1\nstore b\npush 2\nstore a\nfetch b\nstore b\nprintv a\n");
        let idents: Vec<_> = p.idents.iter().collect();
        assert_eq!(idents, vec![(0, "b"), (1, "a")]);
        assert_eq!(p.instructions[4].operand, Operand::Ident("b".to_string()));
    }

    #[test]
    fn test_fetch_does_not_define() {
        let p = parse_program_str("fetch ghost\nprintv ghost\n");
        assert!(p.idents.is_empty());
        assert!(p.labels.is_empty());
        assert_eq!(p.instructions.len(), 2);
    }

    #[test]
    fn test_labels_record_next_instruction_address() {
        let p = parse_program_str("start:\npush 1\n\nloop:\n// comment\npush 2\nadd\nend:\n");
        assert_eq!(p.labels.resolve("start"), Some(0));
        assert_eq!(p.labels.resolve("loop"), Some(1));
        assert_eq!(p.labels.resolve("end"), Some(3));
        assert_eq!(p.instructions.len(), 3);
    }

    #[test]
    fn test_jump_operands_stay_symbolic() {
        let p = parse_program_str("jmp end\njeqz end:\nend:\n");
        assert_eq!(
            ops(&p),
            vec![
                (Opcode::Jmp, Operand::Label("end".to_string())),
                (Opcode::Jeqz, Operand::Label("end".to_string())),
            ]
        );
        assert_eq!(p.labels.resolve("end"), Some(2));
    }

    #[test]
    fn test_instruction_positions() {
        let p = parse_program_str("\n  push 1\n");
        assert_eq!((p.instructions[0].line, p.instructions[0].col), (2, 3));
    }

    #[test]
    fn test_missing_newline() {
        let err = parse_err("add 1\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.contains("`add` not followed by a newline"));
        assert_eq!((err.line, err.col), (Some(1), Some(5)));

        let err = parse_err("push 1 2\n");
        assert!(err.msg.contains("`push <int|bool>` not followed by a newline"));
    }

    #[test]
    fn test_wrong_operand_kind() {
        assert!(parse_err("push x\n").msg.contains("not followed by an int or bool"));
        assert!(parse_err("push\n").msg.contains("not followed by an int or bool"));
        assert!(parse_err("jmp 3\n").msg.contains("not followed by a label"));
        assert!(parse_err("store 3\n").msg.contains("not followed by an identifier"));
        assert!(parse_err("fetch true\n").msg.contains("not followed by an identifier"));
    }

    #[test]
    fn test_bare_identifier_is_rejected() {
        let err = parse_err("push 1\nx\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.contains("unexpected identifier `x`"));
        assert_eq!((err.line, err.col), (Some(2), Some(1)));

        assert!(parse_err("42\n").msg.contains("unexpected literal"));
    }

    #[test]
    fn test_label_must_stand_alone() {
        let err = parse_err("loop: add\n");
        assert!(err.msg.contains("`loop:` not followed by a newline"));
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let err = parse_err("a:\nnoop\na:\n");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.msg.contains("label `a` already declared"));
        assert_eq!(err.line, Some(3));
    }
}
