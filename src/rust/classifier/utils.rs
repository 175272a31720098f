use ndarray::{Array1, ArrayView1};

/// Scales `values` to unit L2 norm in place. An all-zero slice stays zero.
pub(crate) fn l2_normalize(values: &mut [f64]) {
    let norm: f64 = values.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        values.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Numerically stable softmax.
pub(crate) fn softmax(scores: ArrayView1<f64>) -> Array1<f64> {
    let max = scores.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
    let exp = scores.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: ArrayView1<f64>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(array![1000.0, 1001.0, 999.0].view());
        assert!((p.sum() - 1.0).abs() < 1e-12);
        assert!(p.iter().all(|&x| (0.0..=1.0).contains(&x)));
        assert_eq!(argmax(p.view()), Some(1));
    }

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(array![0.5, 0.5, 0.1].view()), Some(0));
        assert_eq!(argmax(Array1::<f64>::zeros(0).view()), None);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.6, 0.8]);
        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
