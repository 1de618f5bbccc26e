//! The bundler pipeline: collect → tree-shake → minify → compress →
//! manifest → validate (§4.4).

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use uic_ir::{Ir, NodeId, NodeTable, PropValue};

use crate::config::BundleConfig;
use crate::content_hash::ContentHash;
use crate::error::{BundlerError, Result};
use crate::manifest::{AssetEntry, Bundle, Manifest, SchemaEntry};
use crate::resolver::BundleSource;

const KNOWN_ASSET_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".mp4", ".mp3", ".ttf", ".otf", ".json",
];

fn is_asset_path(value: &str) -> bool {
    KNOWN_ASSET_EXTENSIONS.iter().any(|ext| value.ends_with(ext))
}

fn collect_prop_strings(value: &PropValue, out: &mut Vec<String>) {
    match value {
        PropValue::Str(s) => out.push(s.clone()),
        PropValue::List(items) => {
            for item in items {
                collect_prop_strings(item, out);
            }
        }
        PropValue::Map(map) => {
            for v in map.values() {
                collect_prop_strings(v, out);
            }
        }
        PropValue::PlatformMap(platform_map) => {
            for v in platform_map.by_platform.values() {
                collect_prop_strings(v, out);
            }
            if let Some(fallback) = &platform_map.fallback {
                collect_prop_strings(fallback, out);
            }
        }
        PropValue::Null
        | PropValue::Bool(_)
        | PropValue::Int(_)
        | PropValue::Decimal(_)
        | PropValue::StateRef(_)
        | PropValue::EventRef(_) => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_recursive(
    source: &dyn BundleSource,
    path: &str,
    visiting: &mut HashSet<String>,
    done: &mut IndexMap<String, Ir>,
    asset_set: &mut HashSet<String>,
    dependencies: &mut Vec<String>,
) -> Result<()> {
    if done.contains_key(path) {
        return Ok(());
    }
    if !visiting.insert(path.to_string()) {
        return Err(BundlerError::DependencyCycle(path.to_string()));
    }

    let ir = source.load_ir(path)?;

    let mut strings = Vec::new();
    for node in ir.nodes.values() {
        for value in node.props.values() {
            collect_prop_strings(value, &mut strings);
        }
    }

    let mut deps = Vec::new();
    for text in &strings {
        if is_asset_path(text) {
            asset_set.insert(text.clone());
        } else if let Some(dep_path) = source.component_path(text) {
            deps.push(dep_path);
        }
    }
    if let Some(nav) = &ir.navigation {
        for route in &nav.routes {
            let component_name = route.component.as_tag();
            match source.component_path(component_name) {
                Some(dep_path) => deps.push(dep_path),
                None => {
                    return Err(BundlerError::MissingDependency(
                        component_name.to_string(),
                        path.to_string(),
                    ))
                }
            }
        }
    }

    for dep_path in &deps {
        if dep_path != path {
            collect_recursive(source, dep_path, visiting, done, asset_set, dependencies)?;
            if !dependencies.contains(dep_path) {
                dependencies.push(dep_path.clone());
            }
        }
    }

    visiting.remove(path);
    done.insert(path.to_string(), ir);
    Ok(())
}

/// Step 1: resolve every IR transitively reachable from `entry` via
/// component-reference props and navigation component references, plus
/// every asset path referenced anywhere in those IRs.
pub fn collect(source: &dyn BundleSource, entry: &str) -> Result<(IndexMap<String, Ir>, Vec<String>, Vec<String>)> {
    let mut visiting = HashSet::new();
    let mut done = IndexMap::new();
    let mut asset_set = HashSet::new();
    let mut dependencies = Vec::new();
    collect_recursive(source, entry, &mut visiting, &mut done, &mut asset_set, &mut dependencies)?;
    let mut assets: Vec<String> = asset_set.into_iter().collect();
    assets.sort();
    Ok((done, assets, dependencies))
}

/// Step 2: drop Nodes unreachable from `ir`'s top-level Nodes, and any
/// Animations/PlatformCodeBlocks no longer referenced by a retained Node.
pub fn tree_shake(ir: &mut Ir) {
    let reachable = uic_ir::invariants::reachable_from(ir, ir.roots.clone());
    ir.nodes.retain(|id, _| reachable.contains(id));

    let referenced_animations: HashSet<String> =
        ir.nodes.values().flat_map(|n| n.animations.iter().cloned()).collect();
    ir.animations.retain(|a| referenced_animations.contains(&a.id));

    let live_components: HashSet<String> = ir
        .roots
        .iter()
        .filter_map(|id| ir.nodes.get(id))
        .filter_map(|n| {
            n.metadata
                .extra
                .get("componentName")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .collect();

    if let Some(schema) = &mut ir.platform {
        schema.blocks.retain(|block| {
            block
                .id
                .rfind("-platform-")
                .map(|idx| live_components.contains(&block.id[..idx]))
                .unwrap_or(true)
        });
    }
}

/// Step 3: strip metadata not required for rendering and rewrite node ids
/// to a dense integer space, preserving canonical (depth-first) traversal
/// order.
pub fn minify(ir: &mut Ir) {
    ir.metadata.generated_at = String::new();
    for node in ir.nodes.values_mut() {
        node.metadata.span = None;
        node.metadata.opaque_source = None;
        node.metadata.warnings.clear();
    }

    let order: Vec<NodeId> = ir.dfs().map(|n| n.id.clone()).collect();
    let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
    for (index, old_id) in order.iter().enumerate() {
        remap.insert(old_id.clone(), NodeId::new(index.to_string()));
    }
    let mut next_index = order.len();
    for id in ir.nodes.keys() {
        if !remap.contains_key(id) {
            remap.insert(id.clone(), NodeId::new(next_index.to_string()));
            next_index += 1;
        }
    }

    let mut new_nodes = NodeTable::new();
    for (old_id, mut node) in std::mem::take(&mut ir.nodes) {
        let new_id = remap.get(&old_id).cloned().unwrap_or(old_id);
        node.id = new_id.clone();
        node.children = node
            .children
            .iter()
            .map(|c| remap.get(c).cloned().unwrap_or_else(|| c.clone()))
            .collect();
        new_nodes.insert(new_id, node);
    }
    ir.nodes = new_nodes;
    ir.roots = ir
        .roots
        .iter()
        .map(|r| remap.get(r).cloned().unwrap_or_else(|| r.clone()))
        .collect();
}

/// Step 4: compress `data` with a standard stream compressor.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    zstd::stream::encode_all(data, 0).map_err(|e| BundlerError::Compression(e.to_string()))
}

fn decompress_if_needed(body: &[u8], uncompressed_len: usize) -> Result<Vec<u8>> {
    if body.len() == uncompressed_len {
        return Ok(body.to_vec());
    }
    zstd::stream::decode_all(body).map_err(|e| BundlerError::Compression(e.to_string()))
}

/// Run the full pipeline (§4.4 steps 1-5) and return the assembled bundle.
/// Does not run step 6 (`validate`) — call [`validate`] separately once the
/// bundle has been written to and read back from its destination, matching
/// how `dashflow-registry` verifies a package's hash after a round-trip
/// through storage.
#[tracing::instrument(skip(source))]
pub fn build_bundle(source: &dyn BundleSource, config: &BundleConfig) -> Result<Bundle> {
    let (mut irs, assets_needed, dependencies) = collect(source, &config.entry)?;

    if config.tree_shake {
        for ir in irs.values_mut() {
            tree_shake(ir);
        }
    }
    if config.minify {
        for ir in irs.values_mut() {
            minify(ir);
        }
    }

    for (path, ir) in &irs {
        let required = uic_ir::invariants::required_minimum_version(ir);
        if ir.schema_version < required {
            return Err(BundlerError::VersionViolation {
                path: path.clone(),
                found: ir.schema_version.clone(),
            });
        }
    }

    let mut ordered_paths: Vec<String> = vec![config.entry.clone()];
    for dep in &dependencies {
        if !ordered_paths.contains(dep) {
            ordered_paths.push(dep.clone());
        }
    }

    let mut schema_entries = Vec::new();
    let mut schema_bodies = IndexMap::new();
    let mut offset = 0usize;
    let mut all_checksums = Vec::new();

    for path in &ordered_paths {
        let ir = irs
            .get(path)
            .ok_or_else(|| BundlerError::MissingEntry(path.clone()))?;
        let canonical = uic_ir::canonical::canonical_string(ir)?;
        let uncompressed_len = canonical.len();
        let checksum = ContentHash::from_bytes(canonical.as_bytes());
        all_checksums.push(checksum.to_hex());

        let body = if config.compress {
            compress_bytes(canonical.as_bytes())?
        } else {
            canonical.into_bytes()
        };

        let start = offset;
        let end = start + body.len();
        offset = end;
        schema_entries.push(SchemaEntry {
            path: path.clone(),
            byte_range: (start, end),
            checksum,
            uncompressed_len,
        });
        schema_bodies.insert(path.clone(), body);
    }

    let mut asset_entries = Vec::new();
    let mut asset_bodies = IndexMap::new();
    for path in &assets_needed {
        let bytes = source.load_asset(path)?;
        let checksum = ContentHash::from_bytes(&bytes);
        all_checksums.push(checksum.to_hex());
        asset_entries.push(AssetEntry {
            path: path.clone(),
            size: bytes.len(),
            checksum,
        });
        asset_bodies.insert(path.clone(), bytes);
    }

    let checksum = ContentHash::from_bytes(all_checksums.join("\n").as_bytes());

    let manifest = Manifest {
        version: semver::Version::new(1, 0, 0),
        entry: config.entry.clone(),
        schemas: schema_entries,
        assets: asset_entries,
        dependencies,
        checksum,
    };

    Ok(Bundle {
        manifest,
        schema_bodies,
        asset_bodies,
    })
}

/// Step 6: recompute every checksum and re-verify schema-version
/// constraints, failing fatally on the first mismatch.
pub fn validate(bundle: &Bundle) -> Result<()> {
    for entry in &bundle.manifest.schemas {
        let body = bundle
            .schema_bodies
            .get(&entry.path)
            .ok_or_else(|| BundlerError::MissingEntry(entry.path.clone()))?;
        let canonical = decompress_if_needed(body, entry.uncompressed_len)?;
        if ContentHash::from_bytes(&canonical) != entry.checksum {
            return Err(BundlerError::ChecksumMismatch(entry.path.clone()));
        }
    }
    for entry in &bundle.manifest.assets {
        let body = bundle
            .asset_bodies
            .get(&entry.path)
            .ok_or_else(|| BundlerError::MissingAsset(entry.path.clone()))?;
        if ContentHash::from_bytes(body) != entry.checksum {
            return Err(BundlerError::ChecksumMismatch(entry.path.clone()));
        }
    }

    let mut all_checksums: Vec<String> = Vec::new();
    for entry in &bundle.manifest.schemas {
        all_checksums.push(entry.checksum.to_hex());
    }
    for entry in &bundle.manifest.assets {
        all_checksums.push(entry.checksum.to_hex());
    }
    if ContentHash::from_bytes(all_checksums.join("\n").as_bytes()) != bundle.manifest.checksum {
        return Err(BundlerError::ChecksumMismatch("<manifest>".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MemorySource;
    use uic_ir::{IrMetadata, Node, NodeKind, SourceLanguage};

    fn leaf_ir(path: &str, root_kind: NodeKind) -> Ir {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, path, "2026-01-01T00:00:00Z"),
        );
        let root = Node::new("root", root_kind);
        let id = ir.insert_node(root);
        ir.roots.push(id);
        ir
    }

    #[test]
    fn collects_entry_and_asset_reference() {
        let mut ir = leaf_ir("Main.tsx", NodeKind::View);
        let child = Node::new("icon", NodeKind::Image).with_prop("src", PropValue::Str("assets/icon.png".into()));
        let child_id = ir.insert_node(child);
        ir.nodes.get_mut(&ir.roots[0]).unwrap().children.push(child_id);

        let source = MemorySource::new()
            .with_ir("Main.tsx", ir)
            .with_asset("assets/icon.png", b"PNGDATA".to_vec());

        let (irs, assets, deps) = collect(&source, "Main.tsx").unwrap();
        assert_eq!(irs.len(), 1);
        assert_eq!(assets, vec!["assets/icon.png".to_string()]);
        assert!(deps.is_empty());
    }

    #[test]
    fn follows_component_reference_to_a_dependency() {
        let child_ir = leaf_ir("Child.tsx", NodeKind::Text);
        let mut parent_ir = leaf_ir("Parent.tsx", NodeKind::View);
        parent_ir.metadata.custom_widgets.insert(
            "Child".to_string(),
            uic_ir::CustomWidgetDescriptor {
                name: "Child".to_string(),
                params: vec![],
                required_params: vec![],
            },
        );
        let reference = Node::new("ref", NodeKind::Custom("Child".to_string()))
            .with_prop("_positional", PropValue::Str("Child".into()));
        let reference_id = parent_ir.insert_node(reference);
        parent_ir.nodes.get_mut(&parent_ir.roots[0]).unwrap().children.push(reference_id);

        let source = MemorySource::new()
            .with_ir("Parent.tsx", parent_ir)
            .with_ir("Child.tsx", child_ir)
            .with_component("Child", "Child.tsx");

        let (irs, _assets, deps) = collect(&source, "Parent.tsx").unwrap();
        assert_eq!(irs.len(), 2);
        assert_eq!(deps, vec!["Child.tsx".to_string()]);
    }

    #[test]
    fn mutual_component_references_are_a_cycle() {
        let mut a = leaf_ir("A.tsx", NodeKind::View);
        a.metadata.custom_widgets.insert(
            "B".to_string(),
            uic_ir::CustomWidgetDescriptor {
                name: "B".to_string(),
                params: vec![],
                required_params: vec![],
            },
        );
        let a_ref = Node::new("ref", NodeKind::Custom("B".to_string()))
            .with_prop("_positional", PropValue::Str("B".into()));
        let a_ref_id = a.insert_node(a_ref);
        a.nodes.get_mut(&a.roots[0]).unwrap().children.push(a_ref_id);

        let mut b = leaf_ir("B.tsx", NodeKind::View);
        b.metadata.custom_widgets.insert(
            "A".to_string(),
            uic_ir::CustomWidgetDescriptor {
                name: "A".to_string(),
                params: vec![],
                required_params: vec![],
            },
        );
        let b_ref = Node::new("ref", NodeKind::Custom("A".to_string()))
            .with_prop("_positional", PropValue::Str("A".into()));
        let b_ref_id = b.insert_node(b_ref);
        b.nodes.get_mut(&b.roots[0]).unwrap().children.push(b_ref_id);

        let source = MemorySource::new()
            .with_ir("A.tsx", a)
            .with_ir("B.tsx", b)
            .with_component("A", "A.tsx")
            .with_component("B", "B.tsx");

        assert!(matches!(collect(&source, "A.tsx"), Err(BundlerError::DependencyCycle(_))));
    }

    #[test]
    fn tree_shake_drops_unreachable_node() {
        let mut ir = leaf_ir("Main.tsx", NodeKind::View);
        let orphan = Node::new("orphan", NodeKind::Text);
        ir.insert_node(orphan);
        assert_eq!(ir.nodes.len(), 2);
        tree_shake(&mut ir);
        assert_eq!(ir.nodes.len(), 1);
    }

    #[test]
    fn minify_rewrites_ids_to_dense_integers_in_traversal_order() {
        let mut ir = leaf_ir("Main.tsx", NodeKind::View);
        let child = Node::new("zzz-child", NodeKind::Text);
        let child_id = ir.insert_node(child);
        ir.nodes.get_mut(&ir.roots[0]).unwrap().children.push(child_id);

        minify(&mut ir);
        assert_eq!(ir.roots[0].as_str(), "0");
        let root = ir.node(&ir.roots[0]).unwrap();
        assert_eq!(root.children[0].as_str(), "1");
        assert!(ir.metadata.generated_at.is_empty());
    }

    #[test]
    fn build_and_validate_round_trip() {
        let ir = leaf_ir("Main.tsx", NodeKind::View);
        let source = MemorySource::new().with_ir("Main.tsx", ir);
        let config = BundleConfig::new("Main.tsx", "out.bundle");
        let bundle = build_bundle(&source, &config).unwrap();
        assert!(validate(&bundle).is_ok());
    }

    #[test]
    fn tampered_schema_body_fails_validation() {
        let ir = leaf_ir("Main.tsx", NodeKind::View);
        let source = MemorySource::new().with_ir("Main.tsx", ir);
        let config = BundleConfig::new("Main.tsx", "out.bundle");
        let mut bundle = build_bundle(&source, &config).unwrap();
        bundle.schema_bodies.get_mut("Main.tsx").unwrap().push(0xFF);
        assert!(matches!(validate(&bundle), Err(BundlerError::ChecksumMismatch(_))));
    }

    #[test]
    fn a_bundle_built_from_a_shared_fixture_can_be_signed_and_verified() {
        let ir = uic_test_utils::simple_view_with_text(SourceLanguage::JsxTs, "Main.tsx");
        let source = MemorySource::new().with_ir("Main.tsx", ir);
        let config = BundleConfig::new("Main.tsx", "out.bundle");
        let bundle = build_bundle(&source, &config).unwrap();
        assert!(validate(&bundle).is_ok());

        let keypair = crate::signature::KeyPair::generate("ci".to_string());
        let signature = keypair.sign_manifest(&bundle.manifest);
        assert!(signature.verify(&bundle.manifest, &keypair.public_key).unwrap());
    }
}
