/// Axis-aligned person box in frame pixel coordinates.
///
/// Produced fresh per frame by the decoder; owned by the current evaluation
/// call and discarded once the frame's verdict is emitted. With positive frame
/// dimensions and well-formed normalized input, `xmin <= xmax` and
/// `ymin <= ymax` hold for every emitted box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// Pixel area, widened so large frames cannot overflow the multiply.
    pub fn area(&self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }

    /// Top-left corner as `[x, y]`.
    pub fn top_left(&self) -> [i32; 2] {
        [self.xmin, self.ymin]
    }

    /// Bottom-right corner as `[x, y]`.
    pub fn bottom_right(&self) -> [i32; 2] {
        [self.xmax, self.ymax]
    }
}
