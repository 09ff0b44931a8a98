mod test_utils;
mod testcases;

#[cfg(feature = "allow_filesystem")]
mod test_from_yaml;
