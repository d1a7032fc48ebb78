// src/log/tests/filter.rs

use super::*;
use crate::log::{get_global_level, is_level_enabled, set_global_level};
use crate::test::guard::TestEnvironment;

test_case!(test_global_level_filtering, (TestEnvironment::Serial), {
    let saved = get_global_level();
    set_global_level(LogLevel::Warning);

    kassert!(is_level_enabled(LogLevel::Emergency));
    kassert!(is_level_enabled(LogLevel::Error));
    kassert!(is_level_enabled(LogLevel::Warning));
    kassert!(!is_level_enabled(LogLevel::Info));
    kassert!(!is_level_enabled(LogLevel::Debug));

    set_global_level(saved);
});

test_case!(test_dynamic_level_change, (TestEnvironment::Serial), {
    let saved = get_global_level();

    set_global_level(LogLevel::Info);
    kassert!(!is_level_enabled(LogLevel::Debug));

    set_global_level(LogLevel::Debug);
    kassert!(is_level_enabled(LogLevel::Debug));
    kassert!(get_global_level() == LogLevel::Debug);

    set_global_level(saved);
});

test_case!(test_level_names, {
    kassert!(LogLevel::from_name("err") == Some(LogLevel::Error));
    kassert!(LogLevel::from_name("WARNING") == Some(LogLevel::Warning));
    kassert!(LogLevel::from_name(" debug ") == Some(LogLevel::Debug));
    kassert!(LogLevel::from_name("5") == Some(LogLevel::Notice));
    kassert!(LogLevel::from_name("9").is_none());
    kassert!(LogLevel::from_name("loud").is_none());
});

test_case!(test_from_u8_saturates, {
    kassert!(LogLevel::from_u8(0) == LogLevel::Emergency);
    kassert!(LogLevel::from_u8(6) == LogLevel::Info);
    kassert!(LogLevel::from_u8(200) == LogLevel::Debug);
});
