// 平滑处理
//
// Centred moving average. The window is truncated at the array ends, there is
// no wraparound.

/// 滑动平均: 每个采样取自身与两侧至多 `radius` 个邻居的均值
pub fn smooth(heights: &[f32], radius: usize) -> Vec<f32> {
    if radius == 0 || heights.len() < 2 {
        return heights.to_vec();
    }

    // prefix sums in f64 so long arrays don't drift
    let mut prefix = Vec::with_capacity(heights.len() + 1);
    prefix.push(0.0f64);
    for &h in heights {
        let last = *prefix.last().unwrap_or(&0.0);
        prefix.push(last + h as f64);
    }

    (0..heights.len())
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(heights.len() - 1);
            let sum = prefix[hi + 1] - prefix[lo];
            (sum / (hi - lo + 1) as f64) as f32
        })
        .collect()
}
