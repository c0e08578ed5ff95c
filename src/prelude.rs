pub use crate::gpio::PortIo as _stm32_pinmap_gpio_PortIo;
pub use crate::hal::delay::DelayNs as _embedded_hal_delay_DelayNs;
pub use crate::hal::digital::InputPin as _embedded_hal_digital_InputPin;
pub use crate::hal::digital::OutputPin as _embedded_hal_digital_OutputPin;
pub use crate::hal::digital::StatefulOutputPin as _embedded_hal_digital_StatefulOutputPin;
pub use crate::pinmap::Configurator as _stm32_pinmap_pinmap_Configurator;
pub use crate::rcc::CoreClock as _stm32_pinmap_rcc_CoreClock;
pub use crate::ticker::CounterSource as _stm32_pinmap_ticker_CounterSource;
pub use fugit::ExtU32 as _fugit_ExtU32;
pub use fugit::RateExtU32 as _fugit_RateExtU32;
