use proptest::prelude::*;

use chia_tools_types::amount::MOJOS_PER_XCH;
use chia_tools_types::{Mojos, NetworkName};

proptest! {
    /// Whole XCH amounts convert to whole * 10^12 mojos.
    #[test]
    fn whole_xch_converts_exactly(whole in 0u64..18_000_000) {
        let mojos = Mojos::from_xch_str(&whole.to_string()).unwrap();
        prop_assert_eq!(mojos.get(), whole * MOJOS_PER_XCH);
    }

    /// A twelve-digit fraction maps one-to-one onto mojos.
    #[test]
    fn fraction_maps_to_mojos(whole in 0u64..1_000, fraction in 0u64..MOJOS_PER_XCH) {
        let input = format!("{whole}.{fraction:012}");
        let mojos = Mojos::from_xch_str(&input).unwrap();
        prop_assert_eq!(mojos.get(), whole * MOJOS_PER_XCH + fraction);
    }

    /// Trailing zeros after the decimal point never change the value.
    #[test]
    fn trailing_zeros_are_ignored(whole in 0u64..1_000, zeros in 0usize..8) {
        let plain = Mojos::from_xch_str(&whole.to_string()).unwrap();
        let padded = Mojos::from_xch_str(&format!("{whole}.{}", "0".repeat(zeros))).unwrap();
        prop_assert_eq!(plain, padded);
    }

    /// Any name made of lowercase letters and digits is a valid network name.
    #[test]
    fn alphanumeric_network_names_are_valid(name in "[a-z0-9]{1,16}") {
        let parsed = NetworkName::new(name.clone()).unwrap();
        prop_assert_eq!(parsed.as_str(), name.as_str());
    }
}
