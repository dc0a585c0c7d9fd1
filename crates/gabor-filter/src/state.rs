use crate::{
    error::GaborError,
    filter::GaborFilter,
    params::{DerivedParams, GaborParams},
};

/// The lifecycle of a Gabor filter built in two steps.
///
/// Parameters are derived first and the kernel is created later. Queries that need
/// a later stage fail with [`GaborError::NotInitialized`] or
/// [`GaborError::KernelNotBuilt`]. [`GaborFilter::new`] performs both steps at once.
///
/// ```
/// use gabor_filter::{GaborError, GaborParams, GaborState, Orientation};
///
/// let state = GaborState::initialize(&GaborParams::new(Orientation::Index(1), 0)).unwrap();
/// assert_eq!(state.width().unwrap(), 25);
/// assert!(matches!(state.filter(), Err(GaborError::KernelNotBuilt)));
///
/// let state = state.create_kernel().unwrap();
/// assert!(state.is_kernel_created());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GaborState {
    /// Nothing has been derived yet.
    #[default]
    Uninitialized,
    /// The parameters are derived, the kernel is not built.
    Initialized(DerivedParams),
    /// The kernel is built and the filter can be applied.
    Ready(GaborFilter),
}

impl GaborState {
    /// Validate the parameters and derive the kernel geometry.
    pub fn initialize(params: &GaborParams) -> Result<Self, GaborError> {
        Ok(GaborState::Initialized(params.derive()?))
    }

    /// Build the kernel, moving an initialized state to [`GaborState::Ready`].
    ///
    /// A ready state is returned as it is.
    pub fn create_kernel(self) -> Result<Self, GaborError> {
        match self {
            GaborState::Uninitialized => Err(GaborError::NotInitialized),
            GaborState::Initialized(derived) => {
                Ok(GaborState::Ready(GaborFilter::from_derived(derived)?))
            }
            ready @ GaborState::Ready(_) => Ok(ready),
        }
    }

    /// Whether the parameters have been derived.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, GaborState::Uninitialized)
    }

    /// Whether the kernel has been built.
    pub fn is_kernel_created(&self) -> bool {
        matches!(self, GaborState::Ready(_))
    }

    /// The kernel side length, available once initialized.
    pub fn width(&self) -> Result<usize, GaborError> {
        match self {
            GaborState::Uninitialized => Err(GaborError::NotInitialized),
            GaborState::Initialized(derived) => Ok(derived.width),
            GaborState::Ready(filter) => Ok(filter.width()),
        }
    }

    /// The derived quantities, available once initialized.
    pub fn derived(&self) -> Result<&DerivedParams, GaborError> {
        match self {
            GaborState::Uninitialized => Err(GaborError::NotInitialized),
            GaborState::Initialized(derived) => Ok(derived),
            GaborState::Ready(filter) => Ok(filter.derived()),
        }
    }

    /// The built filter.
    pub fn filter(&self) -> Result<&GaborFilter, GaborError> {
        match self {
            GaborState::Uninitialized => Err(GaborError::NotInitialized),
            GaborState::Initialized(_) => Err(GaborError::KernelNotBuilt),
            GaborState::Ready(filter) => Ok(filter),
        }
    }

    /// Consume the state and return the built filter.
    pub fn into_filter(self) -> Result<GaborFilter, GaborError> {
        match self {
            GaborState::Uninitialized => Err(GaborError::NotInitialized),
            GaborState::Initialized(_) => Err(GaborError::KernelNotBuilt),
            GaborState::Ready(filter) => Ok(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{params::Orientation, response::ResponseType};

    #[test]
    fn uninitialized_queries_fail() {
        let state = GaborState::default();
        assert!(!state.is_initialized());
        assert!(!state.is_kernel_created());
        assert!(matches!(state.width(), Err(GaborError::NotInitialized)));
        assert!(matches!(state.derived(), Err(GaborError::NotInitialized)));
        assert!(matches!(state.filter(), Err(GaborError::NotInitialized)));
        assert!(matches!(
            state.create_kernel(),
            Err(GaborError::NotInitialized)
        ));
    }

    #[test]
    fn initialized_without_kernel() -> Result<(), GaborError> {
        let state = GaborState::initialize(&GaborParams::new(Orientation::Index(0), 0))?;
        assert!(state.is_initialized());
        assert!(!state.is_kernel_created());
        assert_eq!(state.width()?, 25);
        assert!(matches!(state.filter(), Err(GaborError::KernelNotBuilt)));
        assert!(matches!(
            state.into_filter(),
            Err(GaborError::KernelNotBuilt)
        ));
        Ok(())
    }

    #[test]
    fn ready_matches_direct_construction() -> Result<(), GaborError> {
        let params = GaborParams::new(Orientation::Index(6), -1);
        let state = GaborState::initialize(&params)?.create_kernel()?;
        assert!(state.is_kernel_created());

        // building twice keeps the same kernel
        let state = state.create_kernel()?;
        let filter = state.into_filter()?;
        assert_eq!(filter, GaborFilter::new(params)?);
        assert_eq!(
            filter.kernel_matrix(ResponseType::Real)?,
            GaborFilter::new(params)?.kernel_matrix(ResponseType::Real)?
        );
        Ok(())
    }

    #[test]
    fn initialize_rejects_invalid_parameters() {
        let params = GaborParams::new(Orientation::Index(0), 0).with_sigma(-1.0);
        assert!(matches!(
            GaborState::initialize(&params),
            Err(GaborError::InvalidParameter { name: "sigma", .. })
        ));
    }
}
