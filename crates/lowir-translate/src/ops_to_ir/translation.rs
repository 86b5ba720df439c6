use super::config::TranslateConfig;
use super::context::MappingContext;
use super::errors::Result;
use super::metadata::LoopMetadataCache;
use super::type_converter::{DefaultTypeConverter, TypeConverter};
use lowir_core::Type;
use lowir_ops::{OpType, SourceModule, ValueId};

/// State carried through the translation of one source module.
pub struct ModuleTranslation<'s> {
    source: &'s SourceModule,
    mapping: MappingContext,
    loop_metadata: LoopMetadataCache,
    converter: Box<dyn TypeConverter>,
    config: TranslateConfig,
}

impl<'s> ModuleTranslation<'s> {
    pub fn new(source: &'s SourceModule, config: TranslateConfig) -> Self {
        Self {
            source,
            mapping: MappingContext::new(),
            loop_metadata: LoopMetadataCache::new(),
            converter: Box::new(DefaultTypeConverter),
            config,
        }
    }

    pub fn with_type_converter(mut self, converter: Box<dyn TypeConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// The source module. The reference outlives borrows of the translation itself.
    pub fn source(&self) -> &'s SourceModule {
        self.source
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    pub fn mapping(&self) -> &MappingContext {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut MappingContext {
        &mut self.mapping
    }

    pub fn loop_metadata(&self) -> &LoopMetadataCache {
        &self.loop_metadata
    }

    pub fn loop_metadata_mut(&mut self) -> &mut LoopMetadataCache {
        &mut self.loop_metadata
    }

    pub fn type_converter(&self) -> &dyn TypeConverter {
        self.converter.as_ref()
    }

    pub fn convert_type(&self, ty: &OpType) -> Result<Type> {
        self.converter.convert_type(ty)
    }

    /// Target type of a source value.
    pub fn value_type(&self, value: ValueId) -> Result<Type> {
        self.converter.convert_type(self.source.value_type(value))
    }

    pub fn value_types(&self, values: &[ValueId]) -> Result<Vec<Type>> {
        values.iter().map(|v| self.value_type(*v)).collect()
    }
}
