macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}
