use cubecl::{
    CubeElement, Runtime, client::ComputeClient, ir::StorageType, prelude::CubePrimitive,
    std::tensor::TensorHandle,
};
use half::f16;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Element type a host tensor is uploaded as, and read back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDataType {
    F32,
    F16,
}

impl HostDataType {
    pub fn storage_type(&self) -> StorageType {
        match self {
            HostDataType::F32 => f32::as_type_native_unchecked(),
            HostDataType::F16 => f16::as_type_native_unchecked(),
        }
    }

    /// Machine epsilon of the element type.
    pub fn epsilon(&self) -> f32 {
        match self {
            HostDataType::F32 => f32::EPSILON,
            HostDataType::F16 => f16::EPSILON.to_f32(),
        }
    }

    /// Rounds a value the way storing it in this type would.
    pub fn quantize(&self, value: f32) -> f32 {
        match self {
            HostDataType::F32 => value,
            HostDataType::F16 => f16::from_f32(value).to_f32(),
        }
    }
}

/// Contiguous f32 tensor living on the host.
#[derive(Debug, Clone)]
pub struct HostData {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub strides: Vec<usize>,
}

impl HostData {
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "Data length does not match shape {shape:?}"
        );
        let strides = contiguous_strides(&shape);

        Self {
            data,
            shape,
            strides,
        }
    }

    pub fn filled(shape: Vec<usize>, value: f32) -> Self {
        let len = shape.iter().product();
        Self::from_vec(shape, vec![value; len])
    }

    /// Builds a tensor from its multi-dimensional indices.
    pub fn from_fn(shape: Vec<usize>, f: impl Fn(&[usize]) -> f32) -> Self {
        let mut out = Self::filled(shape, 0.0);
        for index in out.indices().collect::<Vec<_>>() {
            out.set(&index, f(&index));
        }
        out
    }

    /// Uniform values in `[lower, upper)`, reproducible from `seed`.
    pub fn random(shape: Vec<usize>, seed: u64, lower: f32, upper: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = shape.iter().product();
        let data = (0..len).map(|_| rng.random_range(lower..upper)).collect();

        Self::from_vec(shape, data)
    }

    /// Same tensor with every value rounded through the given element type.
    pub fn quantized(&self, dtype: HostDataType) -> Self {
        Self {
            data: self.data.iter().map(|v| dtype.quantize(*v)).collect(),
            ..self.clone()
        }
    }

    pub fn get(&self, index: &[usize]) -> f32 {
        self.data[self.offset(index)]
    }

    pub fn set(&mut self, index: &[usize], value: f32) {
        let offset = self.offset(index);
        self.data[offset] = value;
    }

    fn offset(&self, index: &[usize]) -> usize {
        index.iter().zip(&self.strides).map(|(i, s)| i * s).sum()
    }

    /// Every multi-dimensional index, in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let len: usize = self.shape.iter().product();
        (0..len).map(move |mut flat| {
            let mut index = vec![0; self.shape.len()];
            for d in (0..self.shape.len()).rev() {
                index[d] = flat % self.shape[d];
                flat /= self.shape[d];
            }
            index
        })
    }

    /// Uploads the tensor as a contiguous handle of the given element type.
    pub fn to_handle<R: Runtime>(
        &self,
        client: &ComputeClient<R>,
        dtype: HostDataType,
    ) -> TensorHandle<R> {
        let handle = match dtype {
            HostDataType::F32 => client.create_from_slice(f32::as_bytes(&self.data)),
            HostDataType::F16 => {
                let data: Vec<f16> = self.data.iter().map(|v| f16::from_f32(*v)).collect();
                client.create_from_slice(f16::as_bytes(&data))
            }
        };

        TensorHandle::new(
            handle,
            self.shape.clone(),
            self.strides.clone(),
            dtype.storage_type(),
        )
    }

    /// Allocates a contiguous device tensor whose content is left undefined.
    pub fn empty_handle<R: Runtime>(
        client: &ComputeClient<R>,
        shape: Vec<usize>,
        dtype: HostDataType,
    ) -> TensorHandle<R> {
        let len: usize = shape.iter().product();
        let handle = client.empty(len * dtype.storage_type().size());
        let strides = contiguous_strides(&shape);

        TensorHandle::new(handle, shape, strides, dtype.storage_type())
    }

    /// Reads a contiguous device tensor back to the host.
    pub fn from_handle<R: Runtime>(
        client: &ComputeClient<R>,
        tensor: &TensorHandle<R>,
        dtype: HostDataType,
    ) -> Self {
        let bytes = client.read_one(tensor.handle.clone());
        let data = match dtype {
            HostDataType::F32 => f32::from_bytes(&bytes).to_vec(),
            HostDataType::F16 => f16::from_bytes(&bytes).iter().map(|v| v.to_f32()).collect(),
        };
        let len: usize = tensor.shape.iter().product();

        Self::from_vec(tensor.shape.clone(), data[..len].to_vec())
    }
}

/// Row-major strides of a shape.
pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}
