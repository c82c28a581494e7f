//! Frame cycling for sprite-strip animations.
//!
//! A strip is a row of equally sized frames in one texture. The cycler only
//! tracks which frame is current; mapping a frame to a texture sub-region is
//! the renderer's job.

/// Loops through `frame_count` frames, holding each for `frame_time` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCycler {
    pub frame_count: u32,
    pub frame_time: f32,
    pub current_frame: u32,
    pub elapsed: f32,
}

impl FrameCycler {
    pub fn new(frame_count: u32, frame_time: f32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frame_time,
            current_frame: 0,
            elapsed: 0.0,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// Advance by `dt` seconds. At most one frame is advanced per call and
    /// the timer restarts from zero on each advance, so a long frame does
    /// not skip ahead.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.is_animated() {
            return self.current_frame;
        }
        self.elapsed += dt;
        if self.elapsed >= self.frame_time {
            self.current_frame = (self.current_frame + 1) % self.frame_count;
            self.elapsed = 0.0;
        }
        self.current_frame
    }

    /// Horizontal texture range `[u0, u1]` of the current frame in a strip.
    pub fn strip_u_range(&self) -> (f32, f32) {
        let width = 1.0 / self.frame_count as f32;
        let u0 = self.current_frame as f32 * width;
        (u0, u0 + width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_frame_until_frame_time() {
        let mut cycler = FrameCycler::new(4, 0.1);
        assert_eq!(cycler.tick(0.05), 0);
        assert_eq!(cycler.tick(0.04), 0);
        assert_eq!(cycler.tick(0.02), 1);
        assert_eq!(cycler.elapsed, 0.0);
    }

    #[test]
    fn wraps_after_last_frame() {
        let mut cycler = FrameCycler::new(4, 0.1);
        let frames: Vec<u32> = (0..5).map(|_| cycler.tick(0.1)).collect();
        assert_eq!(frames, vec![1, 2, 3, 0, 1]);
    }

    #[test]
    fn long_delta_advances_a_single_frame() {
        let mut cycler = FrameCycler::new(4, 0.1);
        assert_eq!(cycler.tick(1.0), 1);
    }

    #[test]
    fn single_frame_never_advances() {
        let mut cycler = FrameCycler::new(1, 0.1);
        assert!(!cycler.is_animated());
        assert_eq!(cycler.tick(10.0), 0);
        assert_eq!(cycler.elapsed, 0.0);
    }

    #[test]
    fn zero_frames_is_treated_as_one() {
        let cycler = FrameCycler::new(0, 0.1);
        assert_eq!(cycler.frame_count, 1);
        assert_eq!(cycler.strip_u_range(), (0.0, 1.0));
    }

    #[test]
    fn strip_range_follows_current_frame() {
        let mut cycler = FrameCycler::new(4, 0.1);
        cycler.tick(0.1);
        cycler.tick(0.1);
        assert_eq!(cycler.strip_u_range(), (0.5, 0.75));
    }
}
