//! Scenario tests for budget versioning across the WBS, APU, and markup
//! chain.

use chrono::Utc;
use rust_decimal_macros::dec;

use obralis_shared::types::{PageRequest, ProjectId, UserId, WbsNodeId};

use crate::apu::{ResourceInput, ResourceType};
use crate::budget::error::BudgetError;
use crate::budget::lines::BudgetLineService;
use crate::budget::types::{
    BudgetVersion, LineInput, VersionStatus, VersionType,
};
use crate::budget::version::VersionService;
use crate::markup::MarkupPercentages;
use crate::wbs::{WbsCategory, WbsNode, WbsTree};

fn project_tree(project_id: ProjectId) -> (WbsTree, WbsNodeId, WbsNodeId) {
    let phase = WbsNodeId::new();
    let item_a = WbsNodeId::new();
    let item_b = WbsNodeId::new();

    let node = |id, code: &str, category, parent, quantity| WbsNode {
        id,
        project_id,
        code: code.to_string(),
        name: code.to_string(),
        category,
        parent_id: parent,
        unit: "m2".to_string(),
        quantity,
        is_active: true,
        sort_order: 0,
    };

    let tree = WbsTree::new(vec![
        node(phase, "01", WbsCategory::Phase, None, dec!(0)),
        node(item_a, "01.001", WbsCategory::BudgetItem, Some(phase), dec!(50)),
        node(item_b, "01.002", WbsCategory::BudgetItem, Some(phase), dec!(120)),
    ])
    .unwrap();

    (tree, item_a, item_b)
}

fn draft_version(project_id: ProjectId) -> BudgetVersion {
    BudgetVersion {
        id: obralis_shared::types::BudgetVersionId::new(),
        project_id,
        version_code: "V1".to_string(),
        version_type: VersionType::Initial,
        status: VersionStatus::Draft,
        markups: MarkupPercentages::new(dec!(10), dec!(5), dec!(15), dec!(21)).unwrap(),
        created_by: UserId::new(),
        created_at: Utc::now(),
        approved_by: None,
        approved_at: None,
    }
}

fn apu_line_input(wbs_node_id: WbsNodeId, quantity: rust_decimal::Decimal) -> LineInput {
    LineInput {
        wbs_node_id,
        description: "Excavation".to_string(),
        unit: "m2".to_string(),
        quantity,
        sort_order: 1,
        markups: None,
        resources: vec![
            ResourceInput {
                resource_type: ResourceType::Labor,
                description: "Crew hours".to_string(),
                unit: "h".to_string(),
                quantity_per_unit: dec!(0.5),
                unit_cost: dec!(24),
            },
            ResourceInput {
                resource_type: ResourceType::Equipment,
                description: "Excavator".to_string(),
                unit: "h".to_string(),
                quantity_per_unit: dec!(0.2),
                unit_cost: dec!(40),
            },
        ],
        indirect_cost_pct: None,
        imported_unit_direct_cost: None,
        imported_unit_sale_price: None,
    }
}

#[test]
fn test_price_line_from_apu() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    // 0.5 * 24 + 0.2 * 40 = 20 per unit; 50 units => 1000 direct
    let priced =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(50))).unwrap();

    assert_eq!(priced.apu.total_unit_price, dec!(20.0));
    assert_eq!(priced.line.unit_direct_cost, dec!(20.0));
    assert_eq!(priced.line.direct_cost_total, dec!(1000.0));

    // Markup chain on the unit price: 20 -> 31.944
    let markup = priced.markup.as_ref().unwrap();
    assert_eq!(markup.total_sale, dec!(31.944));
    assert_eq!(priced.line.sale_price_total, dec!(1597.2));

    // Resources were materialized and re-owned by the new line
    assert_eq!(priced.resources.len(), 2);
    assert!(priced
        .resources
        .iter()
        .all(|r| r.budget_line_id == priced.line.id));
}

#[test]
fn test_price_line_per_line_markup_override() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    let mut input = apu_line_input(item_a, dec!(10));
    input.markups = Some(MarkupPercentages::zero());

    let priced = BudgetLineService::price_line(&version, &tree, input).unwrap();
    assert_eq!(priced.line.unit_sale_price, dec!(20.0));
    assert_eq!(priced.line.sale_price_total, dec!(200.0));
}

#[test]
fn test_price_line_imported_without_apu() {
    let project_id = ProjectId::new();
    let (tree, _, item_b) = project_tree(project_id);
    let version = draft_version(project_id);

    let input = LineInput {
        wbs_node_id: item_b,
        description: "Imported lump sum".to_string(),
        unit: "u".to_string(),
        quantity: dec!(1),
        sort_order: 2,
        markups: None,
        resources: vec![],
        indirect_cost_pct: None,
        imported_unit_direct_cost: Some(dec!(5000)),
        imported_unit_sale_price: Some(dec!(6500)),
    };

    let priced = BudgetLineService::price_line(&version, &tree, input).unwrap();
    assert_eq!(priced.line.direct_cost_total, dec!(5000));
    assert_eq!(priced.line.sale_price_total, dec!(6500));
    assert!(priced.markup.is_none());
    assert!(priced.apu.items.is_empty());
}

#[test]
fn test_price_line_rejects_locked_version() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let mut version = draft_version(project_id);
    version.status = VersionStatus::Baseline;

    let result = BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(1)));
    assert!(matches!(
        result,
        Err(BudgetError::ImmutableVersion(VersionStatus::Baseline))
    ));
}

#[test]
fn test_price_line_rejects_non_leaf_node() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    let phase = tree
        .nodes()
        .iter()
        .find(|n| n.category == WbsCategory::Phase)
        .unwrap()
        .id;
    let result = BudgetLineService::price_line(&version, &tree, apu_line_input(phase, dec!(1)));
    assert!(matches!(result, Err(BudgetError::Wbs(_))));

    // Sanity: the leaf still works
    assert!(BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(1))).is_ok());
}

#[test]
fn test_validate_line_checks_resource_aggregate() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    let priced =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(50))).unwrap();
    assert!(BudgetLineService::validate_line(&tree, &priced.line, &priced.resources).is_ok());

    // Tamper with the stored total
    let mut tampered = priced.line.clone();
    tampered.direct_cost_total += dec!(0.01);
    assert!(matches!(
        BudgetLineService::validate_line(&tree, &tampered, &priced.resources),
        Err(BudgetError::Apu(_))
    ));
}

#[test]
fn test_rollup_totals_by_subtree() {
    let project_id = ProjectId::new();
    let (tree, item_a, item_b) = project_tree(project_id);
    let version = draft_version(project_id);

    let line_a =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(50))).unwrap();
    let line_b =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_b, dec!(10))).unwrap();

    let lines = vec![line_a.line.clone(), line_b.line.clone()];
    let rollup = BudgetLineService::rollup_totals(&tree, &lines).unwrap();

    assert_eq!(rollup.line_count, 2);
    assert_eq!(rollup.total_direct_cost, dec!(1200.0));
    assert_eq!(rollup.direct_cost_by_node[&item_a], dec!(1000.0));
    assert_eq!(rollup.direct_cost_by_node[&item_b], dec!(200.0));

    // The phase aggregates both leaves
    let phase = tree
        .nodes()
        .iter()
        .find(|n| n.category == WbsCategory::Phase)
        .unwrap()
        .id;
    assert_eq!(rollup.direct_cost_by_node[&phase], dec!(1200.0));
    assert_eq!(
        rollup.sale_price_by_node[&phase],
        line_a.line.sale_price_total + line_b.line.sale_price_total
    );
}

#[test]
fn test_copy_then_baseline_reproduces_rollup() {
    let project_id = ProjectId::new();
    let (tree, item_a, item_b) = project_tree(project_id);
    let version = draft_version(project_id);

    let line_a =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(50))).unwrap();
    let line_b =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_b, dec!(10))).unwrap();
    let lines = vec![line_a.line, line_b.line];
    let mut resources = line_a.resources;
    resources.extend(line_b.resources);

    let copied = VersionService::copy(
        &version,
        &lines,
        &resources,
        "V2".to_string(),
        VersionType::Revision,
        UserId::new(),
        Utc::now(),
    );

    // Fresh identities
    assert_ne!(copied.version.id, version.id);
    assert_eq!(copied.version.status, VersionStatus::Draft);
    assert_eq!(copied.lines.len(), 2);
    assert_eq!(copied.resources.len(), 4);
    assert!(copied.lines.iter().all(|l| l.version_id == copied.version.id));
    assert!(lines.iter().all(|orig| copied.lines.iter().all(|c| c.id != orig.id)));

    // Baselining the copy reproduces the source rollup totals
    let (action, _) =
        VersionService::baseline(&copied.version, copied.lines.len(), Utc::now()).unwrap();
    assert_eq!(action.new_status(), VersionStatus::Baseline);

    let source_rollup = BudgetLineService::rollup_totals(&tree, &lines).unwrap();
    let copy_rollup = BudgetLineService::rollup_totals(&tree, &copied.lines).unwrap();
    assert_eq!(
        source_rollup.total_direct_cost,
        copy_rollup.total_direct_cost
    );
    assert_eq!(source_rollup.total_sale_price, copy_rollup.total_sale_price);
}

#[test]
fn test_list_lines_ordered_and_paginated() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    let mut lines = Vec::new();
    for sort_order in [3, 1, 2] {
        let mut input = apu_line_input(item_a, dec!(1));
        input.sort_order = sort_order;
        lines.push(
            BudgetLineService::price_line(&version, &tree, input)
                .unwrap()
                .line,
        );
    }

    let page = BudgetLineService::list_lines(&lines, &PageRequest::default());
    let orders: Vec<i32> = page.data.iter().map(|l| l.sort_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(page.meta.total, 3);
}

#[test]
fn test_summarize_version() {
    let project_id = ProjectId::new();
    let (tree, item_a, _) = project_tree(project_id);
    let version = draft_version(project_id);

    let priced =
        BudgetLineService::price_line(&version, &tree, apu_line_input(item_a, dec!(50))).unwrap();
    let summary = BudgetLineService::summarize(&version, &[priced.line]);

    assert_eq!(summary.line_count, 1);
    assert_eq!(summary.total_direct_cost, dec!(1000.0));
    assert_eq!(summary.status, VersionStatus::Draft);
}
