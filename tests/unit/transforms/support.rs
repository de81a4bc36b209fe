use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::source::MemorySource;
use crate::backend::cpu::CpuBackend;
use crate::backend::kernel::Kernel;
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::pipeline::node::ProcessingNode;
use crate::pipeline::pipeline::Pipeline;
use crate::transforms::Transform;

/// Input frames computed by a [`Tracker`], in compute order.
pub(crate) type ReadLog = Rc<RefCell<Vec<usize>>>;

/// Pipeline over one flat `w`x`h` frame per entry of `pixels`.
pub(crate) fn flat_frames(w: u32, h: u32, pixels: &[[f32; 4]]) -> Pipeline {
    let mut src = MemorySource::new();
    let ids: Vec<String> = (0..pixels.len()).map(|i| format!("f{i:02}")).collect();
    for (id, px) in ids.iter().zip(pixels) {
        let img = image::Rgba32FImage::from_pixel(w, h, image::Rgba(*px));
        src.insert(id.clone(), image::DynamicImage::ImageRgba32F(img));
    }
    let mut p = Pipeline::new(Box::new(CpuBackend::new()), Box::new(src));
    p.set_input_frames(ids).unwrap();
    p
}

/// 2x2 opaque frames whose red channel takes the given values.
pub(crate) fn red_frames(reds: &[f32]) -> Pipeline {
    let pixels: Vec<_> = reds.iter().map(|&r| [r, 0.0, 0.0, 1.0]).collect();
    flat_frames(2, 2, &pixels)
}

/// Copies its input frame and logs every index it computes.
#[derive(Debug)]
pub(crate) struct Tracker(pub(crate) ReadLog);

impl Transform for Tracker {
    fn kind(&self) -> &'static str {
        "tracker"
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        self.0.borrow_mut().push(ctx.out_index());
        ctx.execute(&Kernel::Copy, &[src])
    }
}

/// Append a [`Tracker`] so the next node's input reads are logged.
pub(crate) fn track_reads(p: &mut Pipeline) -> ReadLog {
    let log = ReadLog::default();
    p.add_node(ProcessingNode::from_transform(Tracker(Rc::clone(&log))))
        .unwrap();
    log
}

/// Top-left pixel of output frame `index`, which must come out clean.
pub(crate) fn output_pixel(p: &mut Pipeline, index: usize) -> [f32; 4] {
    let frame = p.request_output_frame(index).unwrap();
    assert!(frame.is_ready(), "frame {index} stayed dirty");
    p.read_frame(&frame).unwrap().get_pixel(0, 0).0
}

pub(crate) fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
