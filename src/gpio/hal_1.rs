use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

use super::{DigitalPin, PinModeError, PinState, PortIo};

impl embedded_hal::digital::Error for PinModeError {
    fn kind(&self) -> ErrorKind {
        match self {
            PinModeError::IncorrectMode => ErrorKind::Other,
        }
    }
}

impl<G: PortIo> ErrorType for DigitalPin<G> {
    type Error = PinModeError;
}

impl<G: PortIo> OutputPin for DigitalPin<G> {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }
}

impl<G: PortIo> StatefulOutputPin for DigitalPin<G> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        (*self).is_set_high()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        (*self).is_set_low()
    }
}

impl<G: PortIo> InputPin for DigitalPin<G> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        (*self).is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        (*self).is_low()
    }
}
