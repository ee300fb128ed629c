/// u32-key LSD radix sort for SoA (inds/vals).
/// - Sorts by inds ascending
/// - Reorders vals accordingly, stable for equal keys
///
/// Used to canonicalize sparse vectors whose entries are produced in
/// token first-seen order rather than feature index order.
///
/// Complexity: 4 passes, each O(n + 256)
#[inline]
pub fn radix_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    assert_eq!(inds.len(), vals.len());
    let n = inds.len();
    if n <= 1 {
        return;
    }

    if n <= 32 {
        insertion_sort_u32_soa(inds, vals);
        return;
    }

    // scratch は入力のコピーで初期化 (zeroed 不要)
    let mut inds_tmp = inds.to_vec();
    let mut vals_tmp = vals.to_vec();

    let mut src_inds: &mut [u32] = inds;
    let mut src_vals: &mut [N] = vals;
    let mut dst_inds: &mut [u32] = &mut inds_tmp;
    let mut dst_vals: &mut [N] = &mut vals_tmp;

    for shift in [0u32, 8, 16, 24] {
        let mut count = [0usize; 256];
        for &k in src_inds.iter() {
            count[((k >> shift) & 0xFF) as usize] += 1;
        }

        // prefix sum -> start positions
        let mut sum = 0usize;
        for c in count.iter_mut() {
            let tmp = *c;
            *c = sum;
            sum += tmp;
        }

        for idx in 0..n {
            let k = src_inds[idx];
            let b = ((k >> shift) & 0xFF) as usize;
            let pos = count[b];
            count[b] = pos + 1;
            dst_inds[pos] = k;
            dst_vals[pos] = src_vals[idx];
        }

        std::mem::swap(&mut src_inds, &mut dst_inds);
        std::mem::swap(&mut src_vals, &mut dst_vals);
    }
    // 4 passes (even): result is back in the caller's slices
}

#[inline]
fn insertion_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    for i in 1..inds.len() {
        let mut j = i;
        while j > 0 && inds[j] < inds[j - 1] {
            inds.swap(j, j - 1);
            vals.swap(j, j - 1);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(inds: &[u32], vals: &[u32]) -> (Vec<u32>, Vec<u32>) {
        let mut pairs: Vec<(u32, u32)> = inds.iter().copied().zip(vals.iter().copied()).collect();
        // stable
        pairs.sort_by_key(|p| p.0);
        pairs.into_iter().unzip()
    }

    /// xorshift32
    struct Rng(u32);
    impl Rng {
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }
    }

    #[test]
    fn handles_empty_and_single() {
        let mut inds: Vec<u32> = vec![];
        let mut vals: Vec<f64> = vec![];
        radix_sort_u32_soa(&mut inds, &mut vals);
        assert!(inds.is_empty());

        let mut inds = vec![9u32];
        let mut vals = vec![0.5f64];
        radix_sort_u32_soa(&mut inds, &mut vals);
        assert_eq!(inds, vec![9]);
        assert_eq!(vals, vec![0.5]);
    }

    #[test]
    fn matches_stable_baseline_across_sizes() {
        let mut rng = Rng(0x1234_5678);
        for &n in &[2usize, 7, 31, 32, 33, 100, 1000] {
            let inds: Vec<u32> = (0..n).map(|_| rng.next_u32() & 0x00FF_FFFF).collect();
            let vals: Vec<u32> = (0..n as u32).collect();
            let (base_k, base_v) = baseline(&inds, &vals);

            let mut k = inds.clone();
            let mut v = vals.clone();
            radix_sort_u32_soa(&mut k, &mut v);
            assert_eq!(k, base_k, "keys mismatch at n={n}");
            assert_eq!(v, base_v, "vals mismatch at n={n}");
        }
    }
}
