/// Little-endian pair to `u16`.
pub(crate) fn to_u16(lo: u8, hi: u8) -> u16 {
    ((hi as u16) << 8) + (lo as u16)
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u16() {
        assert_eq!(to_u16(0xE8, 0x03), 1000);
        assert_eq!(to_u16(0xFF, 0x00), 0xFF);
        assert_eq!(to_u16(0x00, 0xFF), 0xFF00);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&[0xFA, 0xA0, 0x05]), "FA A0 05");
        assert_eq!(to_string(&[]), "");
    }
}
