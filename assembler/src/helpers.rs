
// Digits only, sign and radix prefix already stripped by the grammar.
pub fn parse_int(s: &str, base: u32) -> Result<i64, String> {
    i64::from_str_radix(s, base).map_err(|e| format!("Bad integer literal \"{s}\": {e}"))
}
