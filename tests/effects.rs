mod common;

mod tests {
    use embassy_time::{Duration, Instant};
    use led_matrix_composer::color::pack_grb;
    use led_matrix_composer::effect::{
        CampfireEffect, Effect, FireworksEffect, MeteorRainEffect, PlasmaEffect, SparkleEffect,
        SplitMix, WaveRgbEffect,
    };
    use led_matrix_composer::{
        BrightnessTable, EffectId, EffectSlot, Error, FrameBuffer, FrameScheduler, FrameStatus, Rgb,
    };

    use crate::common::{bench, matrix};

    const ALL_IDS: [EffectId; 6] = [
        EffectId::Sparkle,
        EffectId::MeteorRain,
        EffectId::Plasma,
        EffectId::Fireworks,
        EffectId::Campfire,
        EffectId::WaveRgb,
    ];

    fn run<E: Effect>(effect: &mut E, frames: u64) -> FrameBuffer {
        let mut fb = FrameBuffer::new(16, 16);
        let table = BrightnessTable::new(1.0);
        for i in 0..frames {
            effect.render(Instant::from_millis(i * 30), &mut fb, &table);
        }
        fb
    }

    fn lit(fb: &FrameBuffer) -> usize {
        fb.words().iter().filter(|&&w| w != 0).count()
    }

    #[test]
    fn test_effect_ids() {
        for (raw, id) in ALL_IDS.iter().enumerate() {
            assert_eq!(EffectId::from_raw(raw as u8), Some(*id));
            assert_eq!(EffectId::parse_from_str(id.as_str()), Ok(*id));
            assert_eq!(id.to_slot(1).id(), *id);
        }
        assert_eq!(EffectId::from_raw(6), None);
        assert_eq!(EffectId::parse_from_str("disco"), Err(Error::UnknownEffect));
        assert_eq!(EffectSlot::default().id(), EffectId::Plasma);
    }

    #[test]
    fn test_every_effect_draws() {
        for id in ALL_IDS {
            let mut slot = id.to_slot(7);
            let fb = run(&mut slot, 40);
            // Sparkles are random by nature; covered with a fixed density below
            if id != EffectId::Sparkle {
                assert!(lit(&fb) > 0, "{}", id.as_str());
            }
            assert!(fb.is_dirty(), "{}", id.as_str());
            assert!(slot.period() > Duration::from_millis(0));
        }
    }

    #[test]
    fn test_seeded_effects_are_deterministic() {
        let mut a = FireworksEffect::default().with_seed(99);
        let mut b = FireworksEffect::default().with_seed(99);
        assert_eq!(run(&mut a, 12).words(), run(&mut b, 12).words());

        let mut a = MeteorRainEffect::default().with_seed(3);
        let mut b = MeteorRainEffect::default().with_seed(3);
        assert_eq!(run(&mut a, 5).words(), run(&mut b, 5).words());
    }

    #[test]
    fn test_rng() {
        let mut a = SplitMix::new(42);
        let mut b = SplitMix::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        for _ in 0..256 {
            assert!(a.below(10) < 10);
            assert!(a.bits(4) < 16);
        }
        assert_eq!(a.below(0), 0);
    }

    #[test]
    fn test_plasma_first_frame() {
        let mut plasma = PlasmaEffect::default();
        let fb = run(&mut plasma, 1);
        // Both sines are zero at the origin: wheel(0) is pure red
        assert_eq!(fb.words()[0], pack_grb(255, 0, 0));
    }

    #[test]
    fn test_wave_first_pixel() {
        let mut wave = WaveRgbEffect::default();
        let fb = run(&mut wave, 1);
        let px = led_matrix_composer::color::unpack_grb(fb.words()[0]);
        assert_eq!(px.r, 127);
        assert!(px.g > 230);
        assert!(px.b < 20);
    }

    #[test]
    fn test_sparkle_base_and_reset() {
        let base = Rgb { r: 0, g: 0, b: 200 };
        let mut sparkle = SparkleEffect::default()
            .with_base(base)
            .with_density(0.0)
            .with_decay(1.0);
        let fb = run(&mut sparkle, 1);
        assert!(fb.words().iter().all(|&w| w == pack_grb(0, 0, 200)));

        let mut fb = FrameBuffer::new(4, 4);
        let table = BrightnessTable::new(1.0);
        sparkle.reset();
        sparkle.render(Instant::from_millis(0), &mut fb, &table);
        assert_eq!(fb.words()[0], pack_grb(0, 0, 200));
    }

    #[test]
    fn test_sparkle_fades() {
        let mut sparkle = SparkleEffect::default()
            .with_density(1.0)
            .with_decay(0.5)
            .with_seed(5);
        let mut fb = FrameBuffer::new(16, 16);
        let table = BrightnessTable::new(1.0);
        sparkle.render(Instant::from_millis(0), &mut fb, &table);
        assert_eq!(lit(&fb), 1);

        let mut quiet = sparkle.with_density(0.0);
        for _ in 0..16 {
            quiet.render(Instant::from_millis(0), &mut fb, &table);
        }
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn test_campfire_heat_rises_from_origin() {
        let mut fire = CampfireEffect::default().with_sparking(255).with_seed(11);
        let fb = run(&mut fire, 20);
        assert_eq!(fire.heat().len(), 256);
        assert!(fire.heat()[..8].iter().any(|&h| h > 0));
        assert!(lit(&fb) > 0);

        fire.reset();
        assert!(fire.heat().is_empty());
    }

    #[test]
    fn test_scheduler_paces_frames() {
        let bench = bench();
        let m = matrix(&bench, 1.0);
        let slot = EffectId::WaveRgb.to_slot(0);
        let period = slot.period();
        let mut scheduler = FrameScheduler::new(m, slot);
        assert_eq!(scheduler.frame_duration(), period);

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.status, FrameStatus::Presented);
        assert_eq!(result.next_deadline, Instant::from_millis(0) + period);
        assert_eq!(result.sleep_duration, period);
        assert_eq!(bench.borrow().frames.len(), 1);
        assert!(bench.borrow().frames[0].1.iter().any(|&w| w != 0));

        // Late but within two frames: keep the cadence
        let result = scheduler.tick(Instant::from_millis(period.as_millis() + 10));
        assert_eq!(result.next_deadline, Instant::from_millis(0) + period + period);

        // Far behind: skip the backlog
        let result = scheduler.tick(Instant::from_millis(10_000));
        assert_eq!(result.next_deadline, Instant::from_millis(10_000) + period);
    }

    #[test]
    fn test_scheduler_drops_busy_frames() {
        let bench = bench();
        let mut scheduler = FrameScheduler::new(matrix(&bench, 1.0), EffectSlot::default());
        bench.borrow_mut().busy = true;
        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.status, FrameStatus::Dropped);
        assert!(bench.borrow().frames.is_empty());
        assert!(scheduler.matrix().framebuffer().is_dirty());
    }

    #[test]
    fn test_scheduler_switches_effect() {
        let bench = bench();
        let mut scheduler = FrameScheduler::new(matrix(&bench, 1.0), EffectSlot::default());
        scheduler.set_effect(EffectId::Sparkle.to_slot(1));
        assert_eq!(scheduler.effect().id(), EffectId::Sparkle);
        assert_eq!(scheduler.frame_duration(), Duration::from_millis(30));

        let custom = FrameScheduler::with_frame_duration(
            scheduler.into_matrix(),
            EffectSlot::default(),
            Duration::from_millis(5),
        );
        assert_eq!(custom.frame_duration(), Duration::from_millis(5));
    }
}
