use crate::config::ChartConfig;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

/// Annotation for the column being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeMark {
    Bought,
    Sold,
}

/// Fixed-size RGB frame, row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct ChartFrame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl ChartFrame {
    fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }
}

/// Scrolling bar chart over a fixed pixel frame.
///
/// Every committed value becomes one bar of `bar_width` pixel columns pushed
/// in on the right while the oldest bar falls off the left, so the frame
/// always shows the most recent `n_ticks` values. Vertical placement measures
/// value offsets from the bottom edge; offsets outside the frame clamp to the
/// edge rows.
#[derive(Debug)]
pub struct RollingChart {
    frame: ChartFrame,
    bar_width: usize,
    scale: f64,
    fair_value: i64,
    show_fair_line: bool,
}

impl RollingChart {
    pub fn new(cfg: &ChartConfig, fair_value: i64, value_range: i64) -> Result<Self, SimError> {
        if cfg.n_ticks == 0 {
            return Err(SimError::Config("chart.n_ticks must be > 0".to_string()));
        }
        if cfg.image_height == 0 || cfg.image_width == 0 {
            return Err(SimError::Config(format!(
                "chart frame must be non-empty, got {}x{}",
                cfg.image_width, cfg.image_height
            )));
        }
        if cfg.image_width % cfg.n_ticks != 0 {
            return Err(SimError::Config(format!(
                "chart.image_width ({}) must be a multiple of chart.n_ticks ({})",
                cfg.image_width, cfg.n_ticks
            )));
        }
        if value_range <= 0 {
            return Err(SimError::Config(format!(
                "market.n_max must be greater than market.n_min (value range {})",
                value_range
            )));
        }

        Ok(Self {
            frame: ChartFrame::filled(cfg.image_width, cfg.image_height, Rgb::BLACK),
            bar_width: cfg.image_width / cfg.n_ticks,
            scale: cfg.image_height as f64 / value_range as f64,
            fair_value,
            show_fair_line: cfg.show_fair_value_line,
        })
    }

    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn bar_width(&self) -> usize {
        self.bar_width
    }

    /// Render one bar and scroll it into the frame.
    pub fn push(&mut self, value: i64, mark: Option<TradeMark>) {
        let column = self.render_column(value, mark);
        self.append_column(&column);
    }

    /// Render one bar for `value` without touching the frame.
    ///
    /// The fair line is painted first, then the trade band, then the white
    /// value row on top. The band covers the half-open offset range between
    /// the fair value and one tick short of `value`.
    pub fn render_column(&self, value: i64, mark: Option<TradeMark>) -> Vec<Rgb> {
        let mut column = vec![Rgb::BLACK; self.frame.height * self.bar_width];

        if self.show_fair_line {
            self.paint_row(&mut column, self.offset_of(self.fair_value), Rgb::BLUE);
        }

        if let Some(mark) = mark {
            let color = match mark {
                TradeMark::Bought => Rgb::GREEN,
                TradeMark::Sold => Rgb::RED,
            };
            let fair_offset = self.offset_of(self.fair_value);
            let band_offset = self.offset_of(value - 1);
            let (low, high) = (
                fair_offset.min(band_offset),
                fair_offset.max(band_offset),
            );
            for offset in low..high {
                self.paint_row(&mut column, offset, color);
            }
        }

        self.paint_row(&mut column, self.offset_of(value), Rgb::WHITE);
        column
    }

    /// Drop the oldest bar on the left and append `column` on the right.
    fn append_column(&mut self, column: &[Rgb]) {
        let width = self.frame.width;
        let bar = self.bar_width;
        for y in 0..self.frame.height {
            let row = y * width;
            self.frame.pixels.copy_within(row + bar..row + width, row);
            let tail = row + width - bar;
            self.frame.pixels[tail..tail + bar].copy_from_slice(&column[y * bar..(y + 1) * bar]);
        }
    }

    /// Pixel offset of `value` from the bottom edge, clamped to the frame.
    fn offset_of(&self, value: i64) -> usize {
        let raw = (value as f64 * self.scale) as isize;
        raw.clamp(0, self.frame.height as isize - 1) as usize
    }

    fn paint_row(&self, column: &mut [Rgb], offset: usize, color: Rgb) {
        let row = self.frame.height - 1 - offset;
        let start = row * self.bar_width;
        column[start..start + self.bar_width].fill(color);
    }
}
