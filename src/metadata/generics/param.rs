//! The generic parameter descriptor.
//!
//! A descriptor is created once per (declaring entity, position) pair and is
//! immutable after loading; declaring-entity references always point at the
//! open generic definition, never at an instantiation. Derived values
//! (resolved constraints, synthesized base type, interface list) are
//! published through single-assignment cells: concurrent first computation
//! may happen redundantly, but a torn result can never be observed.

use std::{fmt, sync::Arc, sync::OnceLock};

use crate::{
    metadata::{
        assembly::AssemblyRc,
        generics::{ConstraintResolver, GenericContext, GenericParamAttributes},
        method::{MethodRc, MethodRef},
        token::Token,
        typesystem::{
            ConstraintRef, TypeAttributes, TypeEntity, TypeEntityRc, TypeEntityRef, TypeKind,
            TypeRegistry,
        },
    },
    Error::{InvalidArgument, TypeError},
    Result,
};

/// The declaring entity of a generic parameter.
///
/// Exactly one of the two variants applies: a parameter is declared either
/// by a generic type or by a generic method, and the variant determines both
/// the declaring-entity delegation chain and the substitution context used
/// for constraint resolution.
#[derive(Clone)]
pub enum GenericParamOwner {
    /// Declared by a generic type (`class Container<T>`)
    Type(TypeEntityRef),
    /// Declared by a generic method (`void Transform<U>()`)
    Method(MethodRef),
}

impl GenericParamOwner {
    /// Token of the declaring entity, if it is still alive
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match self {
            GenericParamOwner::Type(entity) => entity.token(),
            GenericParamOwner::Method(method) => method.token(),
        }
    }

    /// True for method-level parameters
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, GenericParamOwner::Method(_))
    }
}

/// A generic parameter declared by a generic type or method.
///
/// Holds the parameter's position and raw constraint list; everything else a
/// reflection caller observes (assembly, namespace, synthesized base type,
/// directly implemented interfaces) is derived on demand by delegation to
/// the declaring entity and by constraint resolution.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use typescope::metadata::{
///     generics::{GenericParam, GenericParamAttributes, GenericParamOwner},
///     token::Token,
///     typesystem::{ConstraintRef, TypeAttributes, TypeEntity, TypeKind, TypeRegistry},
/// };
///
/// let registry = Arc::new(TypeRegistry::new());
/// let disposable = Arc::new(TypeEntity::new(
///     Token::new(0x02000010),
///     TypeKind::Interface,
///     "System",
///     "IDisposable",
///     TypeAttributes::PUBLIC | TypeAttributes::INTERFACE,
/// ));
/// registry.insert(&disposable)?;
///
/// let container = Arc::new(TypeEntity::new(
///     Token::new(0x02000001),
///     TypeKind::Class,
///     "App",
///     "Container`1",
///     TypeAttributes::PUBLIC,
/// ));
/// registry.insert(&container)?;
///
/// let param = Arc::new(GenericParam::new(
///     Token::new(0x2A000001),
///     0,
///     GenericParamAttributes::empty(),
///     "T",
///     registry.clone(),
/// ));
/// param.set_owner(GenericParamOwner::Type(container.clone().into()))?;
/// param.push_constraint(ConstraintRef::Type(disposable.token));
/// container.generic_params.push(param.clone());
///
/// assert_eq!(param.base_type()?.fullname(), "System.Object");
/// assert_eq!(param.direct_interfaces()?[0].name, "IDisposable");
/// # Ok::<(), typescope::Error>(())
/// ```
pub struct GenericParam {
    /// Token
    pub token: Token,
    /// Ordinal position among sibling parameters, numbered left-to-right from zero
    pub number: u32,
    /// Variance and special-constraint flags
    pub flags: GenericParamAttributes,
    /// Name of the generic parameter
    pub name: String,
    /// The owner of this `GenericParam`
    owner: OnceLock<GenericParamOwner>,
    /// Raw constraint references in source declaration order
    constraint_refs: Arc<boxcar::Vec<ConstraintRef>>,
    /// Registry used for constraint resolution and placeholder registration
    registry: Arc<TypeRegistry>,
    /// Entity standing for this parameter inside substitution contexts
    placeholder: OnceLock<TypeEntityRc>,
    /// Resolved constraint entities, published once
    resolved: OnceLock<Vec<TypeEntityRc>>,
    /// Synthesized base type, published once
    base: OnceLock<TypeEntityRc>,
    /// Synthesized directly implemented interfaces, published once
    interfaces: OnceLock<Vec<TypeEntityRc>>,
}

impl GenericParam {
    /// Create a new generic parameter descriptor
    pub fn new(
        token: Token,
        number: u32,
        flags: GenericParamAttributes,
        name: &str,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        GenericParam {
            token,
            number,
            flags,
            name: name.to_string(),
            owner: OnceLock::new(),
            constraint_refs: Arc::new(boxcar::Vec::new()),
            registry,
            placeholder: OnceLock::new(),
            resolved: OnceLock::new(),
            base: OnceLock::new(),
            interfaces: OnceLock::new(),
        }
    }

    /// Attach this parameter to its declaring entity
    ///
    /// # Errors
    /// Returns an error if the owner has already been set
    pub fn set_owner(&self, owner: GenericParamOwner) -> Result<()> {
        self.owner
            .set(owner)
            .map_err(|_| malformed_error!("Owner of parameter {} already set", self.name))
    }

    /// Append a raw constraint reference (source declaration order)
    pub fn push_constraint(&self, reference: ConstraintRef) {
        self.constraint_refs.push(reference);
    }

    /// The declaring entity
    ///
    /// # Errors
    /// Returns an error if no owner has been attached (metadata loading bug)
    pub fn owner(&self) -> Result<&GenericParamOwner> {
        self.owner
            .get()
            .ok_or_else(|| malformed_error!("No owner set for parameter {}", self.name))
    }

    /// Zero-based ordinal among sibling parameters
    #[must_use]
    pub fn position(&self) -> u32 {
        self.number
    }

    /// The declaring type, or `None` for method-level parameters (they are
    /// declared by a method, not a type)
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeEntityRc> {
        match self.owner.get() {
            Some(GenericParamOwner::Type(entity)) => entity.upgrade(),
            _ => None,
        }
    }

    /// The declaring method, or `None` for type-level parameters
    #[must_use]
    pub fn declaring_method(&self) -> Option<MethodRc> {
        match self.owner.get() {
            Some(GenericParamOwner::Method(method)) => method.upgrade(),
            _ => None,
        }
    }

    /// The assembly this parameter is attributed to, by delegation through
    /// the declaring type (for method-level parameters, through the method's
    /// declaring type)
    ///
    /// # Errors
    /// Returns an error if the declaring entity chain is broken or the
    /// declaring type is not attributed to an assembly
    pub fn assembly(&self) -> Result<AssemblyRc> {
        let declaring = self.owner_type()?;
        declaring.assembly().ok_or_else(|| {
            malformed_error!("Declaring type {} has no assembly", declaring.fullname())
        })
    }

    /// The namespace of the declaring type
    ///
    /// # Errors
    /// Returns an error if the declaring entity chain is broken
    pub fn namespace(&self) -> Result<String> {
        Ok(self.owner_type()?.namespace.clone())
    }

    /// Always `None`: generic parameter types have no identity string that
    /// can be parsed back into the same type. This is a permanent contract,
    /// not a missing feature.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        None
    }

    /// Always `None`. Since `full_name` is always `None`, assembly
    /// qualification can never be reached through a well-behaved caller;
    /// hitting this in a debug build trips an assertion.
    #[must_use]
    pub fn assembly_qualified_name(&self) -> Option<String> {
        debug_assert!(
            false,
            "generic parameters have no full name to assembly-qualify"
        );
        None
    }

    /// Always true
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        true
    }

    /// Always true: a parameter always contains an unresolved generic
    /// parameter - itself
    #[must_use]
    pub fn contains_generic_parameters(&self) -> bool {
        true
    }

    /// The fixed visibility flags of a generic parameter
    #[must_use]
    pub fn attributes(&self) -> u32 {
        TypeAttributes::PUBLIC
    }

    /// Whether `other` refers to the same parameter definition.
    ///
    /// Generic parameters are never cloned when their owning generic entity
    /// is instantiated, so declaring entity plus position is a stable,
    /// unambiguous identity and structural equality is sufficient.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `other` is absent
    pub fn has_same_metadata_definition_as(&self, other: Option<&GenericParam>) -> Result<bool> {
        let Some(other) = other else {
            return Err(InvalidArgument("other"));
        };

        if self.number != other.number {
            return Ok(false);
        }

        match (self.owner.get(), other.owner.get()) {
            (Some(own), Some(theirs)) => {
                let own_token = own.token();
                Ok(own_token.is_some() && own_token == theirs.token())
            }
            _ => Ok(false),
        }
    }

    /// The resolved constraint entities in source declaration order.
    ///
    /// Resolution happens once; the result is cached on the descriptor. An
    /// empty constraint list short-circuits without building a substitution
    /// context.
    ///
    /// # Errors
    /// Returns an error if any constraint reference cannot be resolved -
    /// this indicates corrupt or mismatched metadata and is never defaulted
    pub fn constraints(&self) -> Result<Vec<TypeEntityRc>> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved.clone());
        }

        let references: Vec<ConstraintRef> = self
            .constraint_refs
            .iter()
            .map(|(_, reference)| reference.clone())
            .collect();

        let resolved = if references.is_empty() {
            Vec::new()
        } else {
            let context = self.context()?;
            ConstraintResolver::new(self.registry.clone()).resolve_all(&references, &context)?
        };

        let published = resolved.clone();
        self.resolved.set(resolved).ok();
        Ok(published)
    }

    /// The synthesized base type: the first constraint in declaration order
    /// that is not an interface, or the root object type if no class
    /// constraint exists
    ///
    /// # Errors
    /// Returns an error if constraint resolution fails
    pub fn base_type(&self) -> Result<TypeEntityRc> {
        if let Some(base) = self.base.get() {
            return Ok(base.clone());
        }

        let resolved = self.constraints()?;
        let base = ConstraintResolver::new(self.registry.clone()).base_type(&resolved);

        self.base.set(base.clone()).ok();
        Ok(base)
    }

    /// The synthesized directly implemented interfaces: every interface
    /// constraint in declaration order. Duplicates are preserved; the
    /// transitive closure computed by callers is responsible for
    /// de-duplication.
    ///
    /// # Errors
    /// Returns an error if constraint resolution fails
    pub fn direct_interfaces(&self) -> Result<Vec<TypeEntityRc>> {
        if let Some(interfaces) = self.interfaces.get() {
            return Ok(interfaces.clone());
        }

        let resolved = self.constraints()?;
        let interfaces = ConstraintResolver::new(self.registry.clone()).direct_interfaces(&resolved);

        let published = interfaces.clone();
        self.interfaces.set(interfaces).ok();
        Ok(published)
    }

    /// The substitution context for resolving this parameter's constraints.
    ///
    /// Type-level parameters resolve positions against the declaring type's
    /// own parameter list. Method-level parameters chain the declaring
    /// type's parameters in as the type-position list, so constraints on a
    /// method parameter may reference the enclosing type's parameters.
    ///
    /// # Errors
    /// Returns an error if the declaring entity has been dropped
    pub fn context(&self) -> Result<GenericContext> {
        match self.owner()? {
            GenericParamOwner::Type(entity) => {
                let declaring = entity.upgrade().ok_or_else(|| {
                    TypeError(format!("Declaring type of parameter {} was dropped", self.name))
                })?;
                Ok(GenericContext::for_type(Self::placeholders_of(
                    &declaring.generic_params,
                )?))
            }
            GenericParamOwner::Method(method) => {
                let declaring = method.upgrade().ok_or_else(|| {
                    TypeError(format!(
                        "Declaring method of parameter {} was dropped",
                        self.name
                    ))
                })?;

                let type_args = match declaring.declaring_type() {
                    Some(owner_type) => Self::placeholders_of(&owner_type.generic_params)?,
                    None => Vec::new(),
                };
                let method_args = Self::placeholders_of(&declaring.generic_params)?;

                Ok(GenericContext::for_method(type_args, method_args))
            }
        }
    }

    /// The entity standing for this parameter itself when it appears inside
    /// a constraint (`T : IComparable<T>`). Materialized lazily in the
    /// registry under an artificial token, distinct per descriptor so the
    /// declaring owner is never conflated.
    ///
    /// # Errors
    /// Returns an error if no owner has been attached yet
    pub fn placeholder(&self) -> Result<TypeEntityRc> {
        let method = self.owner()?.is_method();

        Ok(self
            .placeholder
            .get_or_init(|| {
                let entity = Arc::new(TypeEntity::new(
                    self.registry.alloc_token(),
                    TypeKind::GenericParameter {
                        index: self.number,
                        method,
                    },
                    "",
                    &self.name,
                    TypeAttributes::PUBLIC,
                ));
                self.registry.insert_artificial(&entity);
                entity
            })
            .clone())
    }

    /// The type through which assembly and namespace are attributed: the
    /// declaring type itself, or the declaring method's type
    fn owner_type(&self) -> Result<TypeEntityRc> {
        match self.owner()? {
            GenericParamOwner::Type(entity) => entity.upgrade().ok_or_else(|| {
                TypeError(format!("Declaring type of parameter {} was dropped", self.name))
            }),
            GenericParamOwner::Method(method) => method
                .upgrade()
                .and_then(|m| m.declaring_type())
                .ok_or_else(|| {
                    TypeError(format!(
                        "Declaring method of parameter {} has no declaring type",
                        self.name
                    ))
                }),
        }
    }

    /// Collect the placeholder entities of an owner's parameter list, in order
    fn placeholders_of(params: &crate::metadata::generics::GenericParamList) -> Result<Vec<TypeEntityRc>> {
        let mut entities = Vec::with_capacity(params.count());
        for (_, param) in params.iter() {
            entities.push(param.placeholder()?);
        }
        Ok(entities)
    }
}

impl fmt::Display for GenericParam {
    /// Renders the parameter's simple name, never a full name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::method::Method, Error};

    fn registry() -> Arc<TypeRegistry> {
        Arc::new(TypeRegistry::new())
    }

    fn class(registry: &TypeRegistry, token: u32, namespace: &str, name: &str) -> TypeEntityRc {
        let entity = Arc::new(TypeEntity::new(
            Token::new(token),
            TypeKind::Class,
            namespace,
            name,
            TypeAttributes::PUBLIC,
        ));
        registry.insert(&entity).unwrap();
        entity
    }

    fn param(registry: &Arc<TypeRegistry>, number: u32, name: &str) -> Arc<GenericParam> {
        Arc::new(GenericParam::new(
            Token::new(0x2A000000 + number + 1),
            number,
            GenericParamAttributes::empty(),
            name,
            registry.clone(),
        ))
    }

    fn type_param(registry: &Arc<TypeRegistry>, owner: &TypeEntityRc, number: u32, name: &str) -> Arc<GenericParam> {
        let p = param(registry, number, name);
        p.set_owner(GenericParamOwner::Type(owner.clone().into()))
            .unwrap();
        owner.generic_params.push(p.clone());
        p
    }

    #[test]
    fn position_and_name() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert_eq!(t.position(), 0);
        assert_eq!(t.to_string(), "T");
    }

    #[test]
    fn constant_contract_surface() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert!(t.is_generic_parameter());
        assert!(t.contains_generic_parameters());
        assert_eq!(t.attributes(), TypeAttributes::PUBLIC);
        assert_eq!(t.full_name(), None);
    }

    #[test]
    fn owner_is_single_assignment() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = param(&registry, 0, "T");

        assert!(t.owner().is_err());
        t.set_owner(GenericParamOwner::Type(container.clone().into()))
            .unwrap();
        assert!(t
            .set_owner(GenericParamOwner::Type(container.clone().into()))
            .is_err());
    }

    #[test]
    fn declaring_entity_split_for_type_parameter() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert_eq!(t.declaring_type().unwrap().name, "Container`1");
        assert!(t.declaring_method().is_none());
        assert_eq!(t.namespace().unwrap(), "App");
    }

    #[test]
    fn declaring_entity_split_for_method_parameter() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let method = Arc::new(Method::new(Token::new(0x06000001), "Transform"));
        method.set_declaring_type(&container).unwrap();

        let u = param(&registry, 0, "U");
        u.set_owner(GenericParamOwner::Method(method.clone().into()))
            .unwrap();
        method.generic_params.push(u.clone());

        // Method-level parameters report no declaring type
        assert!(u.declaring_type().is_none());
        assert_eq!(u.declaring_method().unwrap().name, "Transform");
        // ... but namespace delegation goes through the method's type
        assert_eq!(u.namespace().unwrap(), "App");
    }

    #[test]
    fn assembly_delegates_through_declaring_type() {
        use crate::metadata::assembly::Assembly;

        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let assembly = Arc::new(Assembly::new(Token::new(0x20000001), "App", (1, 0, 0, 0)));
        container.set_assembly(assembly).unwrap();

        let t = type_param(&registry, &container, 0, "T");
        assert_eq!(t.assembly().unwrap().name, "App");
    }

    #[test]
    fn assembly_fails_without_attribution() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert!(matches!(t.assembly(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn metadata_definition_comparison_requires_argument() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert!(matches!(
            t.has_same_metadata_definition_as(None),
            Err(Error::InvalidArgument("other"))
        ));
    }

    #[test]
    fn metadata_definition_is_owner_plus_position() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`2");
        let other_type = class(&registry, 0x02000002, "App", "Other`1");

        let t = type_param(&registry, &container, 0, "T");
        let u = type_param(&registry, &container, 1, "U");
        let foreign = type_param(&registry, &other_type, 0, "T");

        // An equivalent descriptor for the same (owner, position) pair
        let t_again = param(&registry, 0, "T");
        t_again
            .set_owner(GenericParamOwner::Type(container.clone().into()))
            .unwrap();

        assert!(t.has_same_metadata_definition_as(Some(&t)).unwrap());
        assert!(t.has_same_metadata_definition_as(Some(&t_again)).unwrap());
        assert!(!t.has_same_metadata_definition_as(Some(&u)).unwrap());
        assert!(!t.has_same_metadata_definition_as(Some(&foreign)).unwrap());
    }

    #[test]
    fn placeholder_is_stable_and_registered() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        let first = t.placeholder().unwrap();
        let second = t.placeholder().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            first.kind,
            TypeKind::GenericParameter {
                index: 0,
                method: false
            }
        ));
        assert!(registry.get(&first.token).is_some());
    }

    #[test]
    fn placeholders_are_distinct_per_owner() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let other_type = class(&registry, 0x02000002, "App", "Other`1");

        let t = type_param(&registry, &container, 0, "T");
        let foreign = type_param(&registry, &other_type, 0, "T");

        let a = t.placeholder().unwrap();
        let b = foreign.placeholder().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn unconstrained_parameter_synthesizes_object() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        assert!(t.constraints().unwrap().is_empty());
        assert_eq!(t.base_type().unwrap().fullname(), "System.Object");
        assert!(t.direct_interfaces().unwrap().is_empty());
    }

    #[test]
    fn derived_values_are_idempotent() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let base_class = class(&registry, 0x02000011, "App", "WidgetBase");

        let t = type_param(&registry, &container, 0, "T");
        t.push_constraint(ConstraintRef::Type(base_class.token));

        let first = t.base_type().unwrap();
        let second = t.base_type().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let constraints_first = t.constraints().unwrap();
        let constraints_second = t.constraints().unwrap();
        assert_eq!(constraints_first.len(), constraints_second.len());
        assert!(Arc::ptr_eq(&constraints_first[0], &constraints_second[0]));
    }

    #[test]
    fn self_referential_constraint_resolves_to_placeholder() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        // T : !0, i.e. the constraint references the parameter itself
        t.push_constraint(ConstraintRef::Var(0));

        let resolved = t.constraints().unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(Arc::ptr_eq(&resolved[0], &t.placeholder().unwrap()));
    }

    #[test]
    fn malformed_position_surfaces_as_error() {
        let registry = registry();
        let container = class(&registry, 0x02000001, "App", "Container`1");
        let t = type_param(&registry, &container, 0, "T");

        // Position 5 does not exist on a one-parameter owner
        t.push_constraint(ConstraintRef::Var(5));
        assert!(matches!(t.constraints(), Err(Error::Malformed { .. })));
    }
}
