pub fn to_slug(val: &str) -> String {
    val.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ', "")
        .replace(" ", "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slug() {
        assert_eq!(to_slug("City Of Bridges"), "city-of-bridges");
        assert_eq!(to_slug("Vayam! 2.0"), "vayam-20");
    }
}
