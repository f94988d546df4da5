pub mod ring;

pub use ring::RingLayout;
