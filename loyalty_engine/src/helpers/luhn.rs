/// Checks a receipt number against the Luhn (mod-10) checksum.
///
/// Only ASCII decimal digits are accepted; the empty string, whitespace, signs and any other character make the
/// number invalid. Counting from the rightmost digit, every digit at an odd distance is doubled (subtracting 9 when
/// the result exceeds 9) and the number is valid when the sum of all digits is a multiple of 10.
pub fn is_valid_luhn(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| match (i % 2 == 1, d * 2) {
            (true, d2) if d2 > 9 => d2 - 9,
            (true, d2) => d2,
            (false, _) => d,
        })
        .sum();
    sum % 10 == 0
}
