/// Inputs for one comparison: two encoded images and a threshold.
///
/// Borrows the upload buffers; nothing outlives the request.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonRequest<'a> {
    pub image_a: &'a [u8],
    pub image_b: &'a [u8],
    pub threshold: f64,
}

impl<'a> ComparisonRequest<'a> {
    pub fn new(image_a: &'a [u8], image_b: &'a [u8], threshold: f64) -> Self {
        Self {
            image_a,
            image_b,
            threshold,
        }
    }
}

/// Summary of a completed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub width: u32,
    pub height: u32,
    /// Pixels classified as different
    pub differing_pixels: u64,
    /// `width × height`
    pub total_pixels: u64,
    /// Encoded PNG of the diff visual
    pub diff_png: Vec<u8>,
}

impl ComparisonResult {
    /// Percentage with exactly two decimals, e.g. `"25.00"`.
    ///
    /// Computed on integers in hundredths of a percent, rounding ties up.
    pub fn percent_string(&self) -> String {
        if self.total_pixels == 0 {
            return "0.00".to_string();
        }
        let differing = u128::from(self.differing_pixels);
        let total = u128::from(self.total_pixels);
        let hundredths = (differing * 20_000 + total) / (2 * total);
        format!("{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(differing: u64, total: u64) -> ComparisonResult {
        ComparisonResult {
            width: total as u32,
            height: 1,
            differing_pixels: differing,
            total_pixels: total,
            diff_png: Vec::new(),
        }
    }

    #[test]
    fn test_percent_string() {
        assert_eq!(result(0, 4).percent_string(), "0.00");
        assert_eq!(result(1, 4).percent_string(), "25.00");
        assert_eq!(result(4, 4).percent_string(), "100.00");
        assert_eq!(result(1, 3).percent_string(), "33.33");
        assert_eq!(result(2, 3).percent_string(), "66.67");
    }

    #[test]
    fn test_percent_string_rounds_ties_up() {
        // 0.125% and 0.375%
        assert_eq!(result(1, 800).percent_string(), "0.13");
        assert_eq!(result(3, 800).percent_string(), "0.38");
        assert_eq!(result(1, 1_600).percent_string(), "0.06");
        assert_eq!(result(7, 8).percent_string(), "87.50");
        assert_eq!(result(0, 0).percent_string(), "0.00");
    }
}
