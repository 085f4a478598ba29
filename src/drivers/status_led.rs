//! RGB status LED driver (three LEDC channels, common cathode).

use crate::drivers::hw_init;

pub struct StatusLed {
    rgb: (u8, u8, u8),
}

impl StatusLed {
    pub fn new() -> Self {
        Self { rgb: (0, 0, 0) }
    }

    /// Set the colour.  Repeating the current colour is a no-op.
    pub fn set(&mut self, r: u8, g: u8, b: u8) {
        if self.rgb == (r, g, b) {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.rgb = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set(0, 0, 0);
    }

    pub fn colour(&self) -> (u8, u8, u8) {
        self.rgb
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
