/// Implements a binary operator trait and its assigning form for
/// `BitVector` in owned and borrowed combinations, forwarding to `$func`.
macro_rules! forward_binop {
    ($imp:ident, $method:ident, $assign_imp:ident, $assign_method:ident, $func:path) => {
        impl std::ops::$imp<&BitVector> for &BitVector {
            type Output = BitVector;

            fn $method(self, rhs: &BitVector) -> BitVector {
                $func(self, rhs)
            }
        }

        impl std::ops::$imp<BitVector> for BitVector {
            type Output = BitVector;

            fn $method(self, rhs: BitVector) -> BitVector {
                $func(&self, &rhs)
            }
        }

        impl std::ops::$imp<&BitVector> for BitVector {
            type Output = BitVector;

            fn $method(self, rhs: &BitVector) -> BitVector {
                $func(&self, rhs)
            }
        }

        impl std::ops::$assign_imp<&BitVector> for BitVector {
            fn $assign_method(&mut self, rhs: &BitVector) {
                *self = $func(self, rhs);
            }
        }

        impl std::ops::$assign_imp<BitVector> for BitVector {
            fn $assign_method(&mut self, rhs: BitVector) {
                *self = $func(self, &rhs);
            }
        }
    };
}
