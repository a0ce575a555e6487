pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;

    /// Equality within an explicit absolute tolerance.
    fn approx_eq(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approx_eq(other, crate::EPSILON as f32)
    }

    fn approx_eq(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approx_eq(other, crate::EPSILON)
    }

    fn approx_eq(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }
}
