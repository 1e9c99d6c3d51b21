/// Constructors for trimmed display-label newtypes over `String`.
#[macro_export]
macro_rules! impl_label_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                let s: String = s.into();
                Self(s.trim().to_owned())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}
