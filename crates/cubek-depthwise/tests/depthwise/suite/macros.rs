#[macro_export]
macro_rules! testgen_depthwise_variant {
    ($variant:expr) => {
        use cubek_depthwise::{Affine, DepthwiseVariant};
        use cubek_test_utils::HostDataType;
        use $crate::suite::test_variant;

        #[test_log::test]
        fn identity_f32() {
            test_variant($variant, 1, Affine::IDENTITY, HostDataType::F32);
        }

        #[test_log::test]
        fn affine_f32_batched() {
            test_variant($variant, 3, Affine::new(0.5, -1.25), HostDataType::F32);
        }

        #[test_log::test]
        fn affine_f16() {
            test_variant($variant, 2, Affine::new(1.5, 0.25), HostDataType::F16);
        }
    };
}
