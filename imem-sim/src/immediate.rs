use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmediateError(pub String);

impl fmt::Display for ImmediateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Immediate Error => {}", self.0)
    }
}

macro_rules! gen_read_immediate {
    ($fnname:ident, $t:ident) => {
        pub fn $fnname(arg: &str) -> Result<$t, ImmediateError> {
            let res = if let Some(hex) = arg.strip_prefix("0x").or(arg.strip_prefix("0X")) {
                $t::from_str_radix(hex, 16)
            } else if let Some(bin) = arg.strip_prefix("0b") {
                $t::from_str_radix(bin, 2)
            } else {
                arg.parse::<$t>()
            };

            match res {
                Ok(v) => Ok(v),
                Err(_) => Err(ImmediateError(arg.to_string())),
            }
        }
    };
}

gen_read_immediate!(parse_imm_u8, u8);
gen_read_immediate!(parse_imm_u16, u16);
gen_read_immediate!(parse_imm_u32, u32);
gen_read_immediate!(parse_imm_usize, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix() {
        assert_eq!(parse_imm_u16("0x1000"), Ok(0x1000));
        assert_eq!(parse_imm_u16("0XABcd"), Ok(0xABCD));
        assert_eq!(parse_imm_u16("4096"), Ok(4096));
        assert_eq!(parse_imm_u8("0b10"), Ok(2));
        assert_eq!(parse_imm_u32("65536"), Ok(65536));
    }

    #[test]
    fn test_invalid() {
        assert!(parse_imm_u16("0x10000").is_err());
        assert!(parse_imm_u16("-1").is_err());
        assert!(parse_imm_u16("0x").is_err());
        assert_eq!(
            parse_imm_usize("ten"),
            Err(ImmediateError("ten".to_string()))
        );
    }
}
