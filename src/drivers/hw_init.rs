//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, LEDC timers/channels, and the command UART
//! using raw ESP-IDF sys calls. Called once from `main()` before the
//! control loop starts.  Any failure here is fatal: the caller must not
//! enter the control loop with half-configured actuators.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={rc})"),
            Self::UartInitFailed(rc) => write!(f, "UART driver install failed (rc={rc})"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_ledc()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::MOTOR_IN1_GPIO, pins::MOTOR_IN2_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Both direction lines low = motor coasting.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_MOTOR: u32 = 0;
pub const LEDC_CH_LED_R: u32 = 1;
pub const LEDC_CH_LED_G: u32 = 2;
pub const LEDC_CH_LED_B: u32 = 3;
pub const LEDC_CH_BUZZER: u32 = 4;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: motor (25 kHz, 8-bit)
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Timer 1: RGB LED (1 kHz, 8-bit)
    let timer1 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer1) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Timer 2: buzzer.  Its frequency is retuned at runtime per tone step;
    // the configured value is just the idle base.
    let timer2 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_2,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::BUZZER_BASE_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer2) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Channel 0: motor PWM
    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::MOTOR_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Channels 1-3: RGB LED
    let led_gpios = [pins::LED_R_GPIO, pins::LED_G_GPIO, pins::LED_B_GPIO];
    for (i, &gpio) in led_gpios.iter().enumerate() {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel: (ledc_channel_t_LEDC_CHANNEL_1 + i as u32),
                timer_sel: ledc_timer_t_LEDC_TIMER_1,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    // Channel 4: buzzer
    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_4,
            timer_sel: ledc_timer_t_LEDC_TIMER_2,
            gpio_num: pins::BUZZER_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC configured (motor=CH0, led=CH1-3, buzzer=CH4)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

/// Retune the buzzer timer and drive the channel at 50% duty.
#[cfg(target_os = "espidf")]
pub fn buzzer_tone(freq_hz: u16) {
    // SAFETY: timer 2 was configured in init_ledc(); main-loop only.
    unsafe {
        ledc_set_freq(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            ledc_timer_t_LEDC_TIMER_2,
            u32::from(freq_hz),
        );
    }
    ledc_set(LEDC_CH_BUZZER, 128);
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_tone(_freq_hz: u16) {}

pub fn buzzer_off() {
    ledc_set(LEDC_CH_BUZZER, 0);
}

// ── Command UART ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART_RX_BUF_BYTES: i32 = 256;

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: pins::UART_BAUD as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    // SAFETY: driver install + config happen once at boot, before any reads.
    unsafe {
        let ret = uart_driver_install(pins::UART_PORT, UART_RX_BUF_BYTES, 0, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        let ret = uart_param_config(pins::UART_PORT, &cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        let ret = uart_set_pin(
            pins::UART_PORT,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
    }

    info!("hw_init: UART{} ready at {} baud", pins::UART_PORT, pins::UART_BAUD);
    Ok(())
}

/// Non-blocking read of whatever command bytes are pending.
/// Returns the number of bytes written into `buf`.
#[cfg(target_os = "espidf")]
pub fn uart_read(buf: &mut [u8]) -> usize {
    // SAFETY: the UART driver was installed during init_uart(); zero timeout
    // makes this a pure FIFO drain from the main loop.
    let n = unsafe { uart_read_bytes(pins::UART_PORT, buf.as_mut_ptr().cast(), buf.len() as u32, 0) };
    if n < 0 { 0 } else { n as usize }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read(_buf: &mut [u8]) -> usize {
    0
}

// ── Fail-stop diagnostics ────────────────────────────────────

/// Last-resort failure indicator: blink the red status LED forever.
///
/// Drives the pin as a plain GPIO output rather than through LEDC, since
/// the LEDC setup may be exactly what failed.  Never returns — callers
/// invoke this instead of entering the control loop.
#[cfg(target_os = "espidf")]
pub fn diagnostic_blink() -> ! {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LED_R_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: failure path before the control loop starts; single-threaded.
    unsafe {
        gpio_config(&cfg);
    }

    let mut on = false;
    loop {
        on = !on;
        // SAFETY: pin was configured as a plain output above.
        unsafe {
            gpio_set_level(pins::LED_R_GPIO, u32::from(on));
        }
        std::thread::sleep(std::time::Duration::from_millis(250));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn diagnostic_blink() -> ! {
    log::error!("hw_init(sim): halted in diagnostic blink");
    loop {
        std::thread::sleep(std::time::Duration::from_millis(250));
    }
}
