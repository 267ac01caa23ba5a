mod k3_s1_in112 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S1In112);
}
mod k3_s2_in112 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S2In112);
}
mod k3_s1_in56 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S1In56);
}
mod k3_s2_in56 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S2In56);
}
mod k3_s1_in28 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S1In28);
}
mod k3_s2_in28 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S2In28);
}
mod k3_s1_in14 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S1In14);
}
mod k3_s2_in14 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S2In14);
}
mod k3_s1_in7 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K3S1In7);
}
mod k5_s2_in56 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K5S2In56);
}
mod k5_s1_in28 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K5S1In28);
}
mod k5_s1_in14 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K5S1In14);
}
mod k5_s2_in14 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K5S2In14);
}
mod k5_s1_in7 {
    crate::testgen_depthwise_variant!(DepthwiseVariant::K5S1In7);
}
