use crate::stock::Stock;

const FRAGMENTATION_WEIGHT: f64 = 0.6;
const SHAPE_WEIGHT: f64 = 0.4;

/// Descriptive score in `[0, 1]` blending the free share of a stock with how
/// square its usable area is. Returns `None` for a zero-area stock.
pub fn efficiency(stock: &Stock) -> Option<f64> {
    let size = stock.size();
    let total = size.area();
    if total == 0 {
        return None;
    }

    let used = stock.occupied_cells().min(total);
    let fragmentation = (total - used) as f64 / total as f64;

    let (w, h) = (size.w as f64, size.h as f64);
    let aspect_ratio = f64::max(w / h, h / w);

    Some(FRAGMENTATION_WEIGHT * fragmentation + SHAPE_WEIGHT / aspect_ratio)
}
