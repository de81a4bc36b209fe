pub(crate) mod frame;
pub(crate) mod frame_sequence;
