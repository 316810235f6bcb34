#[derive(Clone, Debug, Default)]
pub struct Sigmoid {
    amp: f32,
}

impl Sigmoid {
    pub fn new(amp: f32) -> Self {
        Self { amp }
    }

    pub fn f(&self, z: f32) -> f32 {
        self.amp / (1. + (-z).exp())
    }

    pub fn df(&self, z: f32) -> f32 {
        let amp = self.amp;

        (amp * (-z).exp()) / ((-z).exp() + 1.).powi(2)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn midpoint_and_saturation() {
        let s = Sigmoid::new(1.0);

        assert_eq!(s.f(0.), 0.5);
        assert!(s.f(10.) > 0.99);
        assert!(s.f(-10.) < 0.01);
    }

    #[test]
    fn derivative_peaks_at_zero() {
        let s = Sigmoid::new(1.0);

        assert!((s.df(0.) - 0.25).abs() < 1e-6);
        assert!(s.df(5.) < s.df(0.));
    }
}
