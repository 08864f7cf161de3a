mod tests {
    use myrtio_dmx_composer::{ChannelId, ChannelSpec, Error};

    fn ids(spec: &ChannelSpec) -> Vec<u16> {
        spec.channels().iter().map(|id| id.get()).collect()
    }

    #[test]
    fn test_channel_id_bounds() {
        assert!(ChannelId::new(0).is_none());
        assert!(ChannelId::new(513).is_none());
        assert_eq!(ChannelId::new(1).unwrap().index(), 0);
        assert_eq!(ChannelId::new(512).unwrap().index(), 511);
    }

    #[test]
    fn test_parse_single() {
        let spec: ChannelSpec = "100".parse().unwrap();
        assert_eq!(ids(&spec), [100]);
        assert_eq!(spec.universe(), None);
    }

    #[test]
    fn test_parse_width() {
        let spec: ChannelSpec = "5/3".parse().unwrap();
        assert_eq!(ids(&spec), [5, 6, 7]);
    }

    #[test]
    fn test_parse_universe_and_list() {
        let spec: ChannelSpec = "2:5/3,10".parse().unwrap();
        assert_eq!(spec.universe(), Some(2));
        assert_eq!(ids(&spec), [5, 6, 7, 10]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<ChannelSpec>(),
            Err(Error::MalformedChannelSpec { segment: 0 })
        );
        assert_eq!(
            "1,5/0".parse::<ChannelSpec>(),
            Err(Error::MalformedChannelSpec { segment: 1 })
        );
        assert_eq!(
            "511/3".parse::<ChannelSpec>(),
            Err(Error::MalformedChannelSpec { segment: 0 })
        );
        assert!("x:1".parse::<ChannelSpec>().is_err());
        assert!("1/40".parse::<ChannelSpec>().is_err());
    }

    #[test]
    fn test_range() {
        let spec = ChannelSpec::range(ChannelId::new(20).unwrap(), 2).unwrap();
        assert_eq!(ids(&spec), [20, 21]);
    }
}
