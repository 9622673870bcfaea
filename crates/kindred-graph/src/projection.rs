//! The projection boundary — every read leaves the service through here.
//!
//! Projection is total over record state: retired, nameless, or missing
//! endpoint rows all map to views with every field present. Absent text
//! becomes `""` and unknown deceased becomes `false`, so consumers never
//! see a null. Retired records keep resolving but render anonymously:
//! their display name and profile link both project as empty strings.

use kindred_core::{
  id::PersonId,
  person::Person,
  relationship::Relationship,
  store::LoadedEdge,
  view::{PersonView, RelationshipRecord, RelationshipView},
};

fn display_name_of(person: Option<&Person>) -> String {
  person
    .filter(|p| !p.is_retired())
    .map(Person::display_name)
    .unwrap_or_default()
}

fn profile_link_of(person: Option<&Person>) -> String {
  person.and_then(Person::profile_link).unwrap_or_default()
}

fn deceased_of(person: Option<&Person>) -> bool {
  person.and_then(|p| p.deceased).unwrap_or(false)
}

/// Project one loaded edge as seen from `keystone`. Returns `None` only
/// when `keystone` is not an endpoint of the edge.
pub fn project_edge(
  edge: &LoadedEdge,
  keystone: PersonId,
) -> Option<RelationshipView> {
  let counterpart_id = edge.relationship.counterpart_of(keystone)?;
  Some(RelationshipView {
    relationship_id:       edge.relationship.id,
    counterpart_id,
    display_name:          display_name_of(edge.counterpart(keystone)),
    profile_link:          profile_link_of(edge.counterpart(keystone)),
    is_deceased:           deceased_of(edge.counterpart(keystone)),
    keystone_display_name: display_name_of(edge.keystone(keystone)),
    kinship:               edge.relationship.kinship.clone().unwrap_or_default(),
  })
}

/// Project an edge whose endpoint records are already in hand.
pub fn project_pair(
  relationship: &Relationship,
  keystone: &Person,
  counterpart: &Person,
) -> RelationshipView {
  RelationshipView {
    relationship_id:       relationship.id,
    counterpart_id:        counterpart.id,
    display_name:          display_name_of(Some(counterpart)),
    profile_link:          profile_link_of(Some(counterpart)),
    is_deceased:           deceased_of(Some(counterpart)),
    keystone_display_name: display_name_of(Some(keystone)),
    kinship:               relationship.kinship.clone().unwrap_or_default(),
  }
}

/// Project a person record for display. The same blanking rules apply as
/// for edge views, so a record reads the same from every endpoint.
pub fn person_view(person: &Person) -> PersonView {
  PersonView {
    id:           person.id,
    agency_id:    person.agency_id,
    display_name: display_name_of(Some(person)),
    profile_link: profile_link_of(Some(person)),
    is_deceased:  deceased_of(Some(person)),
    is_retired:   person.is_retired(),
  }
}

/// Project a relationship for its own detail endpoints.
pub fn relationship_record(relationship: &Relationship) -> RelationshipRecord {
  RelationshipRecord {
    relationship_id: relationship.id,
    agency_id:       relationship.agency_id,
    from_person:     relationship.from_person,
    to_person:       relationship.to_person,
    kinship:         relationship.kinship.clone().unwrap_or_default(),
    sealed:          relationship.sealed,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
