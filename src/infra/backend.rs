// ============================================================
// Layer 6 — Compute Backend Selection
// ============================================================
// Two Burn backends are compiled in:
//
//   Wgpu    — accelerated path (Vulkan / Metal / DX12)
//   NdArray — plain CPU path
//
// Training requires the accelerated path unless the caller opts
// out with `require_gpu = false`. Evaluation takes the GPU when
// one responds and the CPU otherwise.
//
// Adapter lookup: wgpu panics when asked for an adapter that does not
// exist, so each candidate device is exercised once inside
// catch_unwind with the panic hook silenced. The hook is process
// global, so the lookup runs at most once per process and its
// answer is cached; panics raised on other threads during that
// one lookup print nothing.
//
// Reference: Burn Book §2 (Backends)

use burn::{
    backend::{
        ndarray::NdArrayDevice,
        wgpu::WgpuDevice,
        Autodiff, NdArray, Wgpu,
    },
    prelude::*,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::OnceLock,
};

use crate::domain::error::PipelineError;

pub type GpuBackend = Wgpu;
pub type CpuBackend = NdArray;

/// The autodiff backends used for training
pub type GpuTrainingBackend = Autodiff<GpuBackend>;
pub type CpuTrainingBackend = Autodiff<CpuBackend>;

/// Looks for an accelerated adapter; `find_accelerator` in production
pub type AdapterLookup = fn() -> Option<WgpuDevice>;

static FOUND_ADAPTER: OnceLock<Option<WgpuDevice>> = OnceLock::new();

/// A device on one of the compiled-in backends
#[derive(Debug, Clone)]
pub enum ComputeDevice {
    Gpu(WgpuDevice),
    Cpu(NdArrayDevice),
}

impl ComputeDevice {
    pub fn name(&self) -> String {
        match self {
            ComputeDevice::Gpu(d) => format!("wgpu ({d:?})"),
            ComputeDevice::Cpu(_) => "ndarray (CPU)".to_string(),
        }
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, ComputeDevice::Gpu(_))
    }
}

/// Device for a training run.
/// Fails with BackendUnavailable when `require_gpu` is set and no
/// accelerated adapter responds.
pub fn select_training_device(
    require_gpu:  bool,
    find_adapter: AdapterLookup,
) -> Result<ComputeDevice, PipelineError> {
    match find_adapter() {
        Some(device) => Ok(ComputeDevice::Gpu(device)),
        None if require_gpu => Err(PipelineError::BackendUnavailable),
        None => {
            tracing::warn!("No GPU adapter found, training on the CPU backend");
            Ok(ComputeDevice::Cpu(NdArrayDevice::Cpu))
        }
    }
}

/// Device for inference: GPU when available, CPU otherwise
pub fn select_inference_device() -> ComputeDevice {
    find_accelerator()
        .map(ComputeDevice::Gpu)
        .unwrap_or(ComputeDevice::Cpu(NdArrayDevice::Cpu))
}

/// First hardware adapter that can run a trivial op, discrete before integrated
pub fn find_accelerator() -> Option<WgpuDevice> {
    FOUND_ADAPTER
        .get_or_init(|| {
            [WgpuDevice::DiscreteGpu(0), WgpuDevice::IntegratedGpu(0)]
                .into_iter()
                .find(device_responds)
        })
        .clone()
}

fn device_responds(device: &WgpuDevice) -> bool {
    let device = device.clone();

    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        Tensor::<GpuBackend, 1>::zeros([1], &device).into_data()
    }));
    panic::set_hook(previous_hook);

    match outcome {
        Ok(_) => {
            tracing::debug!("Adapter {:?} responded", device);
            true
        }
        Err(_) => {
            tracing::debug!("Adapter {:?} unavailable", device);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_adapter() -> Option<WgpuDevice> {
        None
    }

    fn discrete_adapter() -> Option<WgpuDevice> {
        Some(WgpuDevice::DiscreteGpu(0))
    }

    #[test]
    fn test_cpu_fallback_when_gpu_optional() {
        let device = select_training_device(false, no_adapter).unwrap();
        assert!(!device.is_accelerated());
        assert_eq!(device.name(), "ndarray (CPU)");
    }

    #[test]
    fn test_required_gpu_without_adapter_is_unavailable() {
        assert!(matches!(
            select_training_device(true, no_adapter),
            Err(PipelineError::BackendUnavailable)
        ));
    }

    #[test]
    fn test_adapter_is_used_when_found() {
        let device = select_training_device(true, discrete_adapter).unwrap();
        assert!(device.is_accelerated());
    }

    #[test]
    fn test_adapter_lookup_is_cached() {
        assert_eq!(find_accelerator(), find_accelerator());
        assert!(FOUND_ADAPTER.get().is_some());
    }
}
