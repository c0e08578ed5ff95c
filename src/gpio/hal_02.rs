use embedded_hal_02::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

use super::{DigitalPin, PinModeError, PinState, PortIo};

impl<G: PortIo> OutputPin for DigitalPin<G> {
    type Error = PinModeError;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }
}

impl<G: PortIo> StatefulOutputPin for DigitalPin<G> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        DigitalPin::is_set_high(self)
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        DigitalPin::is_set_low(self)
    }
}

impl<G: PortIo> ToggleableOutputPin for DigitalPin<G> {
    type Error = PinModeError;

    fn toggle(&mut self) -> Result<(), Self::Error> {
        DigitalPin::toggle(self)
    }
}

impl<G: PortIo> InputPin for DigitalPin<G> {
    type Error = PinModeError;

    fn is_high(&self) -> Result<bool, Self::Error> {
        DigitalPin::is_high(self)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        DigitalPin::is_low(self)
    }
}
