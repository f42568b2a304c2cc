/// Logical resolution all game content is authored against.
pub const DESIGN_WIDTH: f32 = 750.0;
pub const DESIGN_HEIGHT: f32 = 1334.0;

/// Maps design-space coordinates onto the device viewport.
///
/// Computed once from device metrics at startup and never mutated; the game
/// area keeps the design aspect ratio and is centered with letterbox offsets.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapper {
    device_width: f32,
    device_height: f32,
    pixel_ratio: f32,
    scale: f32,
    game_width: f32,
    game_height: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ScreenMapper {
    pub fn new(device_width: f32, device_height: f32, pixel_ratio: f32) -> Self {
        let (device_width, device_height) =
            if device_width > 0.0 && device_height > 0.0 {
                (device_width, device_height)
            } else {
                log::warn!(
                    "degenerate device metrics {device_width}x{device_height}, falling back to design resolution"
                );
                (DESIGN_WIDTH, DESIGN_HEIGHT)
            };

        let scale_x = device_width / DESIGN_WIDTH;
        let scale_y = device_height / DESIGN_HEIGHT;
        let scale = scale_x.min(scale_y);

        let game_width = DESIGN_WIDTH * scale;
        let game_height = DESIGN_HEIGHT * scale;
        let offset_x = (device_width - game_width) / 2.0;
        let offset_y = (device_height - game_height) / 2.0;

        let mapper = Self {
            device_width,
            device_height,
            pixel_ratio,
            scale,
            game_width,
            game_height,
            offset_x,
            offset_y,
        };
        let (gw, gh) = mapper.game_size();
        let (ox, oy) = mapper.offset();
        log::info!(
            "screen initialized: device {device_width}x{device_height} (dpr {pixel_ratio}), \
             game {gw:.0}x{gh:.0}, scale {scale:.3}, offset {ox:.1},{oy:.1}"
        );
        mapper
    }

    /// Design-space X to device pixels.
    pub fn x(&self, design_x: f32) -> f32 {
        self.offset_x + design_x * self.scale
    }

    /// Design-space Y to device pixels.
    pub fn y(&self, design_y: f32) -> f32 {
        self.offset_y + design_y * self.scale
    }

    /// Design-space length to device pixels.
    pub fn px(&self, design_len: f32) -> f32 {
        design_len * self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn device_size(&self) -> (f32, f32) {
        (self.device_width, self.device_height)
    }

    pub fn game_size(&self) -> (f32, f32) {
        (self.game_width, self.game_height)
    }

    pub fn design_size(&self) -> (f32, f32) {
        (DESIGN_WIDTH, DESIGN_HEIGHT)
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_size_device_maps_at_half_scale() {
        let screen = ScreenMapper::new(375.0, 667.0, 2.0);
        assert_eq!(screen.scale(), 0.5);

        let (off_x, _) = screen.offset();
        assert_eq!(screen.x(100.0), off_x + 50.0);
        assert_eq!(screen.px(100.0), 50.0);
    }

    #[test]
    fn game_area_is_centered() {
        // Wider than the design aspect: letterbox on the sides.
        let screen = ScreenMapper::new(1500.0, 1334.0, 1.0);
        assert_eq!(screen.scale(), 1.0);

        let (off_x, off_y) = screen.offset();
        assert_eq!(off_x, 375.0);
        assert_eq!(off_y, 0.0);
        assert_eq!(screen.game_size(), (750.0, 1334.0));
    }

    #[test]
    fn lengths_scale_linearly() {
        let screen = ScreenMapper::new(375.0, 667.0, 2.0);
        assert_eq!(screen.px(10.0) + screen.px(20.0), screen.px(30.0));
        assert_eq!(screen.px(0.0), 0.0);
    }

    #[test]
    fn degenerate_metrics_fall_back_to_identity() {
        let screen = ScreenMapper::new(0.0, -1.0, 1.0);
        assert_eq!(screen.scale(), 1.0);
        assert_eq!(screen.x(100.0), 100.0);
        assert_eq!(screen.y(100.0), 100.0);
    }

    #[test]
    fn design_size_is_fixed() {
        let screen = ScreenMapper::new(1080.0, 1920.0, 3.0);
        assert_eq!(screen.design_size(), (750.0, 1334.0));
    }
}
