/// 24-bit RGB display color
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Uniformly random color
    pub fn random() -> anyhow::Result<Color> {
        let mut rgb = [0; 3];
        getrandom::getrandom(&mut rgb)?;
        Ok(Color(rgb))
    }

    /// Six upper-case hex digits, e.g. `1FA0C3`
    pub fn to_hex(self) -> String {
        hex::encode_upper(self.0)
    }

    /// CSS-style form, e.g. `#1FA0C3`
    pub fn to_css(self) -> String {
        format!("#{}", self.to_hex())
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
