mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_dmx_composer::color::{hsb_to_rgb, white_mix};
    use myrtio_dmx_composer::math8::byte_to_percent;
    use myrtio_dmx_composer::{
        ChannelSpec, ColorConfig, ColorResolver, DimmerConfig, DimmerResolver, Error, FadeBatch,
        Hsb, LightCommand, Resolve, Resolver, Rgb, SwitchResolver, TunableWhiteConfig,
        TunableWhiteResolver, Universe, UniverseConfig,
    };

    fn spec(s: &str) -> ChannelSpec {
        s.parse().unwrap()
    }

    fn targets(batch: &FadeBatch) -> Vec<(u16, u8)> {
        batch.iter().map(|c| (c.channel.get(), c.target)).collect()
    }

    #[test]
    fn test_hsb_to_rgb() {
        assert_eq!(hsb_to_rgb(Hsb::new(0.0, 100.0, 100.0)), Rgb::new(255, 0, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(120.0, 100.0, 100.0)), Rgb::new(0, 255, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(240.0, 100.0, 100.0)), Rgb::new(0, 0, 255));
        assert_eq!(hsb_to_rgb(Hsb::new(60.0, 100.0, 100.0)), Rgb::new(255, 255, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(360.0, 100.0, 100.0)), Rgb::new(255, 0, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(0.0, 0.0, 50.0)), Rgb::new(128, 128, 128));
        assert_eq!(hsb_to_rgb(Hsb::new(0.0, 150.0, 200.0)), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_white_mix() {
        let half = white_mix(100.0, 50.0);
        assert_eq!(byte_to_percent(half.cold), 50);
        assert_eq!(byte_to_percent(half.warm), 50);

        let cold = white_mix(100.0, 0.0);
        assert_eq!((cold.cold, cold.warm), (255, 0));

        let warm = white_mix(100.0, 100.0);
        assert_eq!((warm.cold, warm.warm), (0, 255));

        let mostly_warm = white_mix(100.0, 75.0);
        assert_eq!(byte_to_percent(mostly_warm.cold), 25);
        assert_eq!(byte_to_percent(mostly_warm.warm), 75);
    }

    #[test]
    fn test_dimmer_dynamic_turn_on() {
        let universe = Universe::<512>::new(&UniverseConfig::default()).unwrap();
        let mut dimmer: Resolver = DimmerResolver::new(&spec("5"), DimmerConfig::default())
            .unwrap()
            .into();

        let now = Instant::from_millis(0);
        universe
            .apply_all(&dimmer.resolve(LightCommand::Percent(75.0), now).unwrap())
            .unwrap();
        let ch = spec("5").channels()[0];
        assert_eq!(byte_to_percent(universe.value_at(ch, now).unwrap()), 75);

        universe
            .apply_all(&dimmer.resolve(LightCommand::Off, now).unwrap())
            .unwrap();
        assert_eq!(universe.value_at(ch, now).unwrap(), 0);

        universe
            .apply_all(&dimmer.resolve(LightCommand::On, now).unwrap())
            .unwrap();
        assert_eq!(byte_to_percent(universe.value_at(ch, now).unwrap()), 75);
    }

    #[test]
    fn test_dimmer_defaults_to_full() {
        let mut dimmer = DimmerResolver::new(&spec("1/2"), DimmerConfig::default()).unwrap();
        let batch = dimmer.resolve(LightCommand::On, Instant::from_millis(0)).unwrap();
        assert_eq!(targets(&batch), [(1, 255), (2, 255)]);
    }

    #[test]
    fn test_dimmer_static_turn_on_value() {
        let config = DimmerConfig {
            turn_on_value: "200,100".parse().unwrap(),
            dynamic_turn_on: false,
            fade_time: Duration::from_millis(500),
            ..DimmerConfig::default()
        };
        let mut dimmer = DimmerResolver::new(&spec("1/3"), config).unwrap();
        let now = Instant::from_millis(0);
        dimmer.resolve(LightCommand::Percent(10.0), now).unwrap();

        let batch = dimmer.resolve(LightCommand::On, now).unwrap();
        assert_eq!(targets(&batch), [(1, 200), (2, 100), (3, 200)]);
        assert!(batch.iter().all(|c| c.duration == Duration::from_millis(500)));
    }

    #[test]
    fn test_dimmer_increase_uses_dim_time() {
        let mut dimmer = DimmerResolver::new(&spec("1"), DimmerConfig::default()).unwrap();
        let batch = dimmer.resolve(LightCommand::Increase, Instant::from_millis(0)).unwrap();
        assert_eq!(targets(&batch), [(1, 255)]);
        assert_eq!(batch[0].duration, Duration::from_millis(1000));

        let batch = dimmer.resolve(LightCommand::Decrease, Instant::from_millis(0)).unwrap();
        assert_eq!(targets(&batch), [(1, 0)]);
    }

    #[test]
    fn test_dimmer_rejects_color() {
        let mut dimmer = DimmerResolver::new(&spec("1"), DimmerConfig::default()).unwrap();
        assert_eq!(
            dimmer.resolve(LightCommand::Color(Hsb::WHITE), Instant::from_millis(0)),
            Err(Error::UnsupportedCommand {
                command: "color",
                resolver: "dimmer"
            })
        );
    }

    #[test]
    fn test_switch() {
        let mut switch = SwitchResolver::new(&spec("7"), &DimmerConfig::default()).unwrap();
        let now = Instant::from_millis(0);
        assert_eq!(targets(&switch.resolve(LightCommand::On, now).unwrap()), [(7, 255)]);
        assert_eq!(targets(&switch.resolve(LightCommand::Off, now).unwrap()), [(7, 0)]);
        assert!(switch.resolve(LightCommand::Percent(50.0), now).is_err());
    }

    #[test]
    fn test_color_lockstep_and_restore() {
        let config = ColorConfig {
            fade_time: Duration::from_millis(250),
            ..ColorConfig::default()
        };
        let mut color = ColorResolver::new(&spec("10/3"), config).unwrap();
        let now = Instant::from_millis(0);

        let batch = color
            .resolve(LightCommand::Color(Hsb::new(0.0, 100.0, 100.0)), now)
            .unwrap();
        assert_eq!(targets(&batch), [(10, 255), (11, 0), (12, 0)]);
        assert!(batch.iter().all(|c| c.duration == Duration::from_millis(250)));

        let batch = color.resolve(LightCommand::Off, now).unwrap();
        assert_eq!(targets(&batch), [(10, 0), (11, 0), (12, 0)]);

        let batch = color.resolve(LightCommand::On, now).unwrap();
        assert_eq!(targets(&batch), [(10, 255), (11, 0), (12, 0)]);
    }

    #[test]
    fn test_color_percent_scales_brightness_only() {
        let mut color = ColorResolver::new(&spec("1/3"), ColorConfig::default()).unwrap();
        let now = Instant::from_millis(0);
        color
            .resolve(LightCommand::Color(Hsb::new(240.0, 100.0, 100.0)), now)
            .unwrap();

        let batch = color.resolve(LightCommand::Percent(50.0), now).unwrap();
        assert_eq!(targets(&batch), [(1, 0), (2, 0), (3, 128)]);

        color.resolve(LightCommand::Percent(0.0), now).unwrap();
        let batch = color.resolve(LightCommand::On, now).unwrap();
        assert_eq!(targets(&batch), [(1, 0), (2, 0), (3, 128)]);
    }

    #[test]
    fn test_color_percent_keeps_hue_with_static_turn_on() {
        let config = ColorConfig {
            dynamic_turn_on: false,
            ..ColorConfig::default()
        };
        let mut color = ColorResolver::new(&spec("1/3"), config).unwrap();
        let now = Instant::from_millis(0);
        color
            .resolve(LightCommand::Color(Hsb::new(0.0, 100.0, 100.0)), now)
            .unwrap();

        let batch = color.resolve(LightCommand::Percent(50.0), now).unwrap();
        assert_eq!(targets(&batch), [(1, 128), (2, 0), (3, 0)]);

        let batch = color.resolve(LightCommand::Increase, now).unwrap();
        assert_eq!(targets(&batch), [(1, 255), (2, 0), (3, 0)]);

        // ON still uses the configured color
        let batch = color.resolve(LightCommand::On, now).unwrap();
        assert_eq!(targets(&batch), [(1, 255), (2, 255), (3, 255)]);
    }

    #[test]
    fn test_color_groups() {
        assert_eq!(
            ColorResolver::new(&spec("1/4"), ColorConfig::default()).err(),
            Some(Error::ChannelGrouping { group: 3, actual: 4 })
        );
        let mut color = ColorResolver::new(&spec("1/6"), ColorConfig::default()).unwrap();
        let batch = color
            .resolve(LightCommand::Color(Hsb::new(120.0, 100.0, 100.0)), Instant::from_millis(0))
            .unwrap();
        assert_eq!(
            targets(&batch),
            [(1, 0), (2, 255), (3, 0), (4, 0), (5, 255), (6, 0)]
        );
    }

    #[test]
    fn test_tunable_white() {
        let mut white = TunableWhiteResolver::new(&spec("20/2"), TunableWhiteConfig::default()).unwrap();
        let now = Instant::from_millis(0);

        let batch = white.resolve(LightCommand::Percent(100.0), now).unwrap();
        assert_eq!(targets(&batch), [(20, 128), (21, 128)]);

        let batch = white.resolve(LightCommand::ColorTemperature(0.0), now).unwrap();
        assert_eq!(targets(&batch), [(20, 255), (21, 0)]);

        let batch = white.resolve(LightCommand::ColorTemperature(100.0), now).unwrap();
        assert_eq!(targets(&batch), [(20, 0), (21, 255)]);

        white.resolve(LightCommand::Percent(40.0), now).unwrap();
        white.resolve(LightCommand::Off, now).unwrap();
        // Temperature changes while off only take effect on the next ON
        assert!(white
            .resolve(LightCommand::ColorTemperature(75.0), now)
            .unwrap()
            .is_empty());

        let batch = white.resolve(LightCommand::On, now).unwrap();
        assert_eq!(targets(&batch), [(20, 26), (21, 77)]);
    }

    #[test]
    fn test_tunable_white_rejects_color() {
        let mut white = TunableWhiteResolver::new(&spec("1/2"), TunableWhiteConfig::default()).unwrap();
        assert!(white
            .resolve(LightCommand::Color(Hsb::WHITE), Instant::from_millis(0))
            .is_err());
        assert_eq!(
            TunableWhiteResolver::new(&spec("1/3"), TunableWhiteConfig::default()).err(),
            Some(Error::ChannelGrouping { group: 2, actual: 3 })
        );
    }
}
