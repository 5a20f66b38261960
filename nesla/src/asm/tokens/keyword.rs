use crate::asm::literal::Literal;
use crate::asm::tokens::TokenKind;
use std::str::FromStr;
use strum::{AsRefStr, EnumCount, EnumIter, EnumString, FromRepr};

/// A member of one of the fixed keyword tables.
///
/// The position of a keyword within its table is the subtype of the token it produces.
pub trait Keyword: Sized + Copy + FromStr + AsRef<str> {
    /// The kind of token this keyword is emitted as.
    const KIND: TokenKind;

    fn subtype(self) -> usize;

    fn from_subtype(subtype: usize) -> Option<Self>;

    /// Exact, case-sensitive lookup of an accumulated lexeme.
    fn lookup(literal: &Literal) -> Option<Self> {
        let text = std::str::from_utf8(literal.get()).ok()?;
        Self::from_str(text).ok()
    }
}

macro_rules! keyword_table {
    ($keyword:ty, $kind:expr) => {
        impl Keyword for $keyword {
            const KIND: TokenKind = $kind;

            fn subtype(self) -> usize {
                self as usize
            }

            fn from_subtype(subtype: usize) -> Option<Self> {
                Self::from_repr(subtype)
            }
        }
    };
}

#[derive(
    Eq, PartialEq, Debug, Copy, Clone, Hash, EnumString, AsRefStr, EnumIter, EnumCount, FromRepr,
)]
#[repr(usize)]
pub enum Directive {
    #[strum(serialize = "BANK")]
    Bank,
    #[strum(serialize = "BYTE")]
    Byte,
    #[strum(serialize = "CHR")]
    Character,
    #[strum(serialize = "DEF")]
    Define,
    #[strum(serialize = "INC")]
    Include,
    #[strum(serialize = "INCB")]
    IncludeBinary,
    #[strum(serialize = "MAP")]
    Mapper,
    #[strum(serialize = "MIR")]
    Mirror,
    #[strum(serialize = "ORG")]
    Origin,
    #[strum(serialize = "PRG")]
    Program,
    #[strum(serialize = "RESV")]
    Reserve,
    #[strum(serialize = "UNDEF")]
    Undefine,
    #[strum(serialize = "WORD")]
    Word,
}

/// The official 6502 instruction set, in alphabetical order.
#[derive(
    Eq, PartialEq, Debug, Copy, Clone, Hash, EnumString, AsRefStr, EnumIter, EnumCount, FromRepr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(usize)]
pub enum Instruction {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

/// Register names that may appear as operands.
#[derive(
    Eq, PartialEq, Debug, Copy, Clone, Hash, EnumString, AsRefStr, EnumIter, EnumCount, FromRepr,
)]
#[repr(usize)]
pub enum Operand {
    #[strum(serialize = "A")]
    Accumulator,
    #[strum(serialize = "X")]
    IndexX,
    #[strum(serialize = "Y")]
    IndexY,
}

#[derive(
    Eq, PartialEq, Debug, Copy, Clone, Hash, EnumString, AsRefStr, EnumIter, EnumCount, FromRepr,
)]
#[repr(usize)]
pub enum Symbol {
    // ,
    #[strum(serialize = ",")]
    Separator,
    // #
    #[strum(serialize = "#")]
    Immediate,
    // )
    #[strum(serialize = ")")]
    IndirectClose,
    // (
    #[strum(serialize = "(")]
    IndirectOpen,
}

keyword_table!(Directive, TokenKind::Directive);
keyword_table!(Instruction, TokenKind::Instruction);
keyword_table!(Operand, TokenKind::Operand);
keyword_table!(Symbol, TokenKind::Symbol);

#[cfg(test)]
mod tests {
    use crate::asm::literal::Literal;
    use crate::asm::tokens::keyword::{Directive, Instruction, Keyword, Operand, Symbol};
    use itertools::Itertools;
    use strum::{EnumCount, IntoEnumIterator};

    fn lookup<K: Keyword>(text: &str) -> Option<K> {
        K::lookup(&Literal::from(text))
    }

    #[test]
    fn table_sizes() {
        assert_eq!(Directive::COUNT, 13);
        assert_eq!(Instruction::COUNT, 56);
        assert_eq!(Operand::COUNT, 3);
        assert_eq!(Symbol::COUNT, 4);
    }

    #[test]
    fn subtypes_are_table_indices() {
        assert_eq!(Directive::Bank.subtype(), 0);
        assert_eq!(Directive::Word.subtype(), 12);
        assert_eq!(Instruction::Adc.subtype(), 0);
        assert_eq!(Instruction::Lda.subtype(), 29);
        assert_eq!(Instruction::Tya.subtype(), 55);
        assert_eq!(Symbol::IndirectOpen.subtype(), 3);
        for (index, instruction) in Instruction::iter().enumerate() {
            assert_eq!(instruction.subtype(), index);
            assert_eq!(Instruction::from_subtype(index), Some(instruction));
        }
        assert_eq!(Instruction::from_subtype(56), None);
    }

    #[test]
    fn lookup_keywords() {
        assert_eq!(lookup::<Instruction>("LDA"), Some(Instruction::Lda));
        assert_eq!(lookup::<Instruction>("INX"), Some(Instruction::Inx));
        assert_eq!(lookup::<Directive>("INCB"), Some(Directive::IncludeBinary));
        assert_eq!(lookup::<Directive>("CHR"), Some(Directive::Character));
        assert_eq!(lookup::<Operand>("X"), Some(Operand::IndexX));
        assert_eq!(lookup::<Symbol>("#"), Some(Symbol::Immediate));
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        assert_eq!(lookup::<Instruction>("lda"), None);
        assert_eq!(lookup::<Instruction>("LDAX"), None);
        assert_eq!(lookup::<Instruction>("LD"), None);
        assert_eq!(lookup::<Operand>("x"), None);
        assert_eq!(lookup::<Directive>("FOO"), None);
        assert_eq!(lookup::<Symbol>(""), None);
    }

    #[test]
    fn keyword_names() {
        let names = Instruction::iter()
            .map(|instruction| instruction.as_ref().to_string())
            .collect_vec();
        assert!(names.iter().all(|name| name.len() == 3));
        assert_eq!(names.iter().unique().count(), 56);
        assert_eq!(Directive::Reserve.as_ref(), "RESV");
        assert_eq!(Symbol::Separator.as_ref(), ",");
    }
}
