use crate::stock::{FREE, PADDING, Stock};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws the usable area of a stock inside a border, one character per cell:
/// `.` for free cells and a letter per product index for occupied ones.
/// Sheets larger than the terminal budget are sampled down.
pub fn render_stock(stock: &Stock) -> String {
    let size = stock.size();
    if size.is_empty() {
        return String::new();
    }

    let scale = f64::min(
        1.0,
        f64::min(MAX_WIDTH / size.w as f64, MAX_HEIGHT / size.h as f64),
    );
    let grid_w = ((size.w as f64 * scale).round() as usize).max(1);
    let grid_h = ((size.h as f64 * scale).round() as usize).max(1);

    let mut result = String::new();
    let border = format!("+{}+\n", "-".repeat(grid_w));
    result.push_str(&border);
    for gy in 0..grid_h {
        result.push('|');
        for gx in 0..grid_w {
            let x = sample(gx, size.w, grid_w);
            let y = sample(gy, size.h, grid_h);
            result.push(symbol(stock.cell(x, y).unwrap_or(PADDING)));
        }
        result.push_str("|\n");
    }
    result.push_str(&border);
    result
}

fn sample(idx: usize, cells: u32, slots: usize) -> u32 {
    ((idx as u64 * cells as u64) / slots as u64) as u32
}

fn symbol(cell: i32) -> char {
    match cell {
        FREE => '.',
        PADDING => ' ',
        c if c >= 0 => LABELS[c as usize % LABELS.len()] as char,
        _ => '#',
    }
}
