/// Create an enum that can be stepped through in order, wrapping around at
/// either end (e.g. menu items with up/down.)
#[macro_export]
macro_rules! cyclic_enum {
    ($name:ident, $($variant:ident),*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            /// Every variant, in order
            pub const ALL: &'static [$name] = &[
                $($name::$variant),*
            ];

            /// Where this variant sits in `ALL`
            pub fn index(self) -> usize {
                self as usize
            }

            /// Step forward, wrapping to the start
            pub fn next(self) -> Self {
                Self::ALL[(self.index() + 1) % Self::ALL.len()]
            }

            /// Step backward, wrapping to the end
            pub fn prev(self) -> Self {
                Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }
    };
}
