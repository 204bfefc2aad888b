use log::trace;
use rand::Rng;

/// Offsets written during one outer pass at a given granularity:
/// `skip, 2 * skip, ...` while below `len`, with `skip = max(1, len / granularity)`.
#[derive(Debug, Clone)]
pub struct Pass {
    pos: usize,
    skip: usize,
    len: usize,
}

impl Pass {
    pub fn new(len: usize, granularity: usize) -> Self {
        let skip = (len / granularity).max(1);
        Self {
            pos: skip,
            skip,
            len,
        }
    }

    /// Distance between consecutive offsets.
    pub fn stride(&self) -> usize {
        self.skip
    }
}

impl Iterator for Pass {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.pos >= self.len {
            return None;
        }
        let pos = self.pos;
        self.pos = self.pos.saturating_add(self.skip);
        Some(pos)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TouchStats {
    pub passes: u64,
    pub writes: u64,
    /// Granularity of the last pass started; 1 if none ran.
    pub granularity: usize,
}

/// Writes random bytes into `block`, one pass per granularity starting at 2,
/// for as long as `keep_going` says so.
///
/// `keep_going` is polled before every pass and before every write, so a
/// deadline check bounds the overshoot to one write. Early passes land far
/// apart (roughly one per page), later ones fill in between, so as many
/// distinct pages as possible are touched before time runs out without
/// knowing the page size.
pub fn touch_pages<R, F>(block: &mut [u8], rng: &mut R, mut keep_going: F) -> TouchStats
where
    R: Rng + ?Sized,
    F: FnMut() -> bool,
{
    let mut stats = TouchStats {
        granularity: 1,
        ..TouchStats::default()
    };
    while keep_going() {
        stats.granularity += 1;
        let mut pass = Pass::new(block.len(), stats.granularity);
        trace!(
            "Pass {}: granularity {}, skip {}",
            stats.passes,
            stats.granularity,
            pass.stride()
        );
        while keep_going() {
            let Some(pos) = pass.next() else { break };
            block[pos] = rng.random();
            stats.writes += 1;
        }
        stats.passes += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::RngCore;
    use std::time::{Duration, Instant};

    /// Always yields 0xff bytes so touched offsets are visible.
    struct Saturated;

    impl RngCore for Saturated {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xff);
        }
    }

    fn budget(mut calls: usize) -> impl FnMut() -> bool {
        move || {
            if calls == 0 {
                return false;
            }
            calls -= 1;
            true
        }
    }

    fn touched(block: &[u8]) -> Vec<usize> {
        block
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != 0)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn pass_offsets() {
        assert_eq!(Pass::new(10, 2).collect::<Vec<_>>(), vec![5]);
        assert_eq!(Pass::new(10, 3).collect::<Vec<_>>(), vec![3, 6, 9]);
        assert_eq!(Pass::new(10, 4).collect::<Vec<_>>(), vec![2, 4, 6, 8]);
        assert_eq!(Pass::new(4, 20).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn pass_stride_is_at_least_one() {
        assert_eq!(Pass::new(3, 1000).stride(), 1);
        assert_eq!(Pass::new(10, 3).stride(), 3);
        assert_eq!(Pass::new(1, 2).collect::<Vec<_>>(), Vec::<usize>::new());
    }

    #[test]
    fn pass_stays_in_bounds() {
        for len in [1, 2, 7, 4096, 4097, 65_537] {
            for granularity in 2..64 {
                let pass = Pass::new(len, granularity);
                let skip = pass.stride();
                assert!(skip >= 1);
                assert!(
                    pass.clone().all(|pos| pos < len),
                    "len {len} granularity {granularity}"
                );
                assert_eq!(pass.count(), (len - 1) / skip);
            }
        }
    }

    #[test]
    fn pass_does_not_wrap_near_usize_max() {
        let mut pass = Pass::new(usize::MAX, 2);
        assert_eq!(pass.next(), Some(usize::MAX / 2));
        assert_eq!(pass.next(), Some(usize::MAX / 2 * 2));
        assert_eq!(pass.next(), None);
    }

    #[test]
    fn nothing_happens_without_budget() {
        let mut block = [0u8; 16];
        let stats = touch_pages(&mut block, &mut Saturated, || false);
        assert_eq!(
            stats,
            TouchStats {
                passes: 0,
                writes: 0,
                granularity: 1
            }
        );
        assert_eq!(touched(&block), Vec::<usize>::new());
    }

    #[test]
    fn first_pass_touches_the_middle() {
        // outer check, write at 8, exhausted check
        let mut block = [0u8; 16];
        let stats = touch_pages(&mut block, &mut Saturated, budget(3));
        assert_eq!(touched(&block), vec![8]);
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.granularity, 2);
    }

    #[test]
    fn second_pass_touches_thirds() {
        let mut block = [0u8; 16];
        let stats = touch_pages(&mut block, &mut Saturated, budget(8));
        assert_eq!(touched(&block), vec![5, 8, 10, 15]);
        assert_eq!(stats.passes, 2);
        assert_eq!(stats.writes, 4);
    }

    #[test]
    fn deadline_can_cut_a_pass_short() {
        let mut block = [0u8; 16];
        // second pass gets two checks: one write, then stop
        let stats = touch_pages(&mut block, &mut Saturated, budget(5));
        assert_eq!(touched(&block), vec![5, 8]);
        assert_eq!(stats.writes, 2);
    }

    #[test]
    fn enough_passes_cover_every_offset_but_zero() {
        let mut block = [0u8; 16];
        let stats = touch_pages(&mut block, &mut Saturated, budget(1000));
        assert_eq!(touched(&block), (1..16).collect::<Vec<_>>());
        assert!(stats.granularity >= 16);
    }

    #[test]
    fn stops_at_the_deadline() {
        let mut block = vec![0u8; 1 << 20];
        let started = Instant::now();
        let runtime = Duration::from_millis(100);
        let stats = touch_pages(&mut block, &mut Saturated, || started.elapsed() < runtime);
        assert!(started.elapsed() >= runtime);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(stats.writes > 0);
    }
}
