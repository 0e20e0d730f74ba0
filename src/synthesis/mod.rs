pub mod four_bar;

pub use four_bar::{
    FourBar, FourBarLengths, FourBarOptions, FourBarPose, FourBarSynthesizer, GrashofReport,
};
