use std::env;

#[derive(Clone, Copy, Debug)]
enum GetOneError {
    None,
    Multiple,
}

trait IteratorExt: Iterator {
    fn get_one(self) -> Result<Self::Item, GetOneError>;
}

impl<T: Iterator> IteratorExt for T {
    fn get_one(mut self) -> Result<Self::Item, GetOneError> {
        match (self.next(), self.next()) {
            (Some(res), None) => Ok(res),
            (None, _) => Err(GetOneError::None),
            _ => Err(GetOneError::Multiple),
        }
    }
}

fn main() {
    // Host builds (tests, docs) select no chip family at all.
    let family = env::vars()
        .map(|(a, _)| a)
        .filter(|x| x == "CARGO_FEATURE_STM32F1" || x == "CARGO_FEATURE_STM32F0")
        .get_one();

    match family {
        Ok(_) | Err(GetOneError::None) => {}
        Err(GetOneError::Multiple) => panic!("Multiple stm32 chip family features enabled"),
    }
}
