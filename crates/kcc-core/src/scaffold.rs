//! Boilerplate generators.
//!
//! Each generator writes a skeleton Go file at the canonical location for
//! its artifact and refuses to overwrite anything that already exists.
//! Templates are static text with name substitution; the generated code
//! compiles only after the operator fills in the marked sections.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct TypesParams {
    pub resource: String,
    pub service: String,
    pub version: String,
    pub proto_package: String,
    pub proto_message: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityParams {
    pub resource: String,
    pub service: String,
    pub version: String,
    /// e.g. `projects/{project}/locations/{location}/widgets/{widget}`
    pub resource_name_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControllerParams {
    pub resource: String,
    pub service: String,
    pub version: String,
    pub proto_package: String,
    pub proto_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockGcpParams {
    pub resource: String,
    pub service: String,
    pub proto_package: String,
    pub proto_message: String,
    pub resource_name_format: String,
}

/// Result of a scaffold operation: the repo-relative path that was created
/// and guidance for what to do next.
#[derive(Debug, Clone, Serialize)]
pub struct Scaffolded {
    pub path: String,
    pub message: String,
}

/// Generate the KRM types file for a resource.
pub fn scaffold_types(config: &Config, params: &TypesParams) -> Result<Scaffolded> {
    let resource_lower = params.resource.to_lowercase();
    let rel = paths::types_file(&params.service, &params.version, &resource_lower);
    ensure_absent(
        config,
        &rel,
        "types file",
        "\nUse add-field to add fields to existing types",
    )?;

    let description = params
        .description
        .clone()
        .unwrap_or_else(|| format!("{} resource", params.resource));
    let content = render(
        TYPES_TEMPLATE,
        &[
            ("@YEAR@", &current_year()),
            ("@VERSION@", &params.version),
            ("@GVK@", &gvk_name(&params.service, &params.resource)),
            ("@RESOURCE@", &params.resource),
            ("@PROTO_PACKAGE@", &params.proto_package),
            ("@PROTO_MESSAGE@", &params.proto_message),
            ("@DESCRIPTION@", &description),
        ],
    );
    write_new(config, &rel, &content)?;

    Ok(Scaffolded {
        path: rel.clone(),
        message: format!(
            "Created types file: {rel}\n\nNext steps:\n\
             1. Fill in the Spec fields with proper +kcc:proto= annotations\n\
             2. Add nested types if needed\n\
             3. Run: ./dev/tasks/generate-mapper {}\n\
             4. Use scaffold-identity to create the identity handler",
            params.resource
        ),
    })
}

/// Generate the identity handler for a resource.
pub fn scaffold_identity(config: &Config, params: &IdentityParams) -> Result<Scaffolded> {
    let resource_lower = params.resource.to_lowercase();
    let rel = paths::identity_file(&params.service, &params.version, &resource_lower);
    ensure_absent(config, &rel, "identity file", "")?;

    let has_location = params
        .resource_name_format
        .split('/')
        .any(|part| part == "locations");

    let parent_fields = if has_location {
        "ProjectID string\n\tLocation  string"
    } else {
        "ProjectID string"
    };
    let parent_string = if has_location {
        r#"return fmt.Sprintf("projects/%s/locations/%s", i.ProjectID, i.Location)"#
    } else {
        r#"return fmt.Sprintf("projects/%s", i.ProjectID)"#
    };
    let location_check = if has_location {
        "\n\tlocation := obj.Spec.Location\n\tif location == \"\" {\n\t\treturn nil, fmt.Errorf(\"spec.location is required\")\n\t}\n"
    } else {
        ""
    };
    let location_field = if has_location {
        "\n\t\t\tLocation:  location,"
    } else {
        ""
    };

    let content = render(
        IDENTITY_TEMPLATE,
        &[
            ("@YEAR@", &current_year()),
            ("@VERSION@", &params.version),
            ("@RESOURCE@", &params.resource),
            ("@NAME_FORMAT@", &params.resource_name_format),
            ("@PARENT_FIELDS@", parent_fields),
            ("@PARENT_STRING@", parent_string),
            ("@LOCATION_CHECK@", location_check),
            ("@LOCATION_FIELD@", location_field),
        ],
    );
    write_new(config, &rel, &content)?;

    Ok(Scaffolded {
        path: rel.clone(),
        message: format!(
            "Created identity file: {rel}\n\nNext steps:\n\
             1. Verify the resource name format matches the GCP API\n\
             2. Adjust parsing logic if needed\n\
             3. Use scaffold-controller to create the controller"
        ),
    })
}

/// Generate the direct controller skeleton for a resource.
pub fn scaffold_controller(config: &Config, params: &ControllerParams) -> Result<Scaffolded> {
    let resource_lower = params.resource.to_lowercase();
    let rel = paths::controller_file(&params.service, &resource_lower);
    ensure_absent(config, &rel, "controller file", "")?;

    let content = render(
        CONTROLLER_TEMPLATE,
        &[
            ("@YEAR@", &current_year()),
            ("@SERVICE@", &params.service),
            ("@VERSION@", &params.version),
            ("@GVK@", &gvk_name(&params.service, &params.resource)),
            ("@RESOURCE@", &params.resource),
            ("@PROTO_MESSAGE@", &params.proto_message),
        ],
    );
    write_new(config, &rel, &content)?;

    Ok(Scaffolded {
        path: rel.clone(),
        message: format!(
            "Created controller file: {rel}\n\nNext steps:\n\
             1. Implement GCP API calls in Find, Create, Update, Delete\n\
             2. Add field mask logic for Update\n\
             3. Implement reference resolution if needed\n\
             4. Use scaffold-mockgcp to create the mock server"
        ),
    })
}

/// Generate the mock GCP server skeleton for a resource.
pub fn scaffold_mockgcp(config: &Config, params: &MockGcpParams) -> Result<Scaffolded> {
    let resource_lower = params.resource.to_lowercase();
    let rel = paths::mockgcp_file(&params.service, &resource_lower);
    ensure_absent(config, &rel, "mock server file", "")?;

    let content = render(
        MOCKGCP_TEMPLATE,
        &[
            ("@YEAR@", &current_year()),
            ("@SERVICE@", &params.service),
            ("@SERVER@", &format!("{}Server", title(&params.service))),
            ("@RESOURCE@", &params.resource),
            ("@RESOURCE_LOWER@", &resource_lower),
            ("@PROTO_PACKAGE@", &params.proto_package),
            ("@NAME_FORMAT@", &params.resource_name_format),
        ],
    );
    write_new(config, &rel, &content)?;

    Ok(Scaffolded {
        path: rel.clone(),
        message: format!(
            "Created mock server file: {rel}\n\nNext steps:\n\
             1. Register the server in mockgcp/mock{}/service.go\n\
             2. Create test fixtures in pkg/test/resourcefixture/testdata/\n\
             3. Run tests with E2E_GCP_TARGET=mock",
            params.service
        ),
    })
}

fn ensure_absent(config: &Config, rel: &str, what: &str, hint: &str) -> Result<()> {
    if config.repo_root.join(rel).exists() {
        return Err(Error::PreconditionFailed(format!(
            "{what} already exists: {rel}{hint}"
        )));
    }
    Ok(())
}

fn write_new(config: &Config, rel: &str, content: &str) -> Result<()> {
    let path = config.repo_root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (token, value) in substitutions {
        out = out.replace(token, value);
    }
    out
}

fn current_year() -> String {
    chrono::Utc::now().year().to_string()
}

/// `svcx` + `Widget` -> `SvcxWidget`, the kind name used for the GVK.
fn gvk_name(service: &str, resource: &str) -> String {
    format!("{}{resource}", title(service))
}

fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

const TYPES_TEMPLATE: &str = r#"// Copyright @YEAR@ Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

package @VERSION@

import (
	"github.com/GoogleCloudPlatform/k8s-config-connector/pkg/apis/k8s/v1alpha1"
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

var @GVK@GVK = GroupVersion.WithKind("@GVK@")

// @RESOURCE@Spec defines the desired state of @RESOURCE@
// +kcc:proto=@PROTO_PACKAGE@.@PROTO_MESSAGE@
type @RESOURCE@Spec struct {
	// TODO: Add fields here with proper +kcc:proto= annotations
	// Example:
	// // Description of the resource
	// // +kcc:proto=@PROTO_PACKAGE@.@PROTO_MESSAGE@.description
	// Description *string `json:"description,omitempty"`

	// REQUIRED: Immutable. The Project that this resource belongs to.
	ProjectRef *v1alpha1.ProjectRef `json:"projectRef"`

	// REQUIRED: Immutable. The location for the resource
	Location string `json:"location"`

	// REQUIRED: The @RESOURCE@ name. If not given, the metadata.name will be used.
	// + optional
	ResourceID *string `json:"resourceID,omitempty"`
}

// @RESOURCE@Status defines the config connector machine state of @RESOURCE@
type @RESOURCE@Status struct {
	/* Conditions represent the latest available observations of the
	   object's current state. */
	Conditions []v1alpha1.Condition `json:"conditions,omitempty"`

	// ObservedGeneration is the generation of the resource that was most recently observed by the Config Connector controller.
	ObservedGeneration *int64 `json:"observedGeneration,omitempty"`

	// A unique specifier for the @RESOURCE@ resource in GCP.
	ExternalRef *string `json:"externalRef,omitempty"`

	// ObservedState is the state of the resource as most recently observed in GCP.
	ObservedState *@RESOURCE@ObservedState `json:"observedState,omitempty"`
}

// @RESOURCE@ObservedState is the state of the @RESOURCE@ resource as most recently observed in GCP.
// +kcc:proto=@PROTO_PACKAGE@.@PROTO_MESSAGE@
type @RESOURCE@ObservedState struct {
	// TODO: Add observed state fields here
	// These are typically output-only fields from the GCP API
}

// +genclient
// +k8s:deepcopy-gen:interfaces=k8s.io/apimachinery/pkg/runtime.Object
// +kubebuilder:resource:categories=gcp
// +kubebuilder:subresource:status

// @GVK@ is the Schema for the @DESCRIPTION@ API
// +k8s:openapi-gen=true
type @GVK@ struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	// +required
	Spec   @RESOURCE@Spec   `json:"spec,omitempty"`
	Status @RESOURCE@Status `json:"status,omitempty"`
}

// +k8s:deepcopy-gen:interfaces=k8s.io/apimachinery/pkg/runtime.Object
// @GVK@List contains a list of @GVK@
type @GVK@List struct {
	metav1.TypeMeta `json:",inline"`
	metav1.ListMeta `json:"metadata,omitempty"`
	Items           []@GVK@ `json:"items"`
}

func init() {
	SchemeBuilder.Register(&@GVK@{}, &@GVK@List{})
}
"#;

const IDENTITY_TEMPLATE: &str = r#"// Copyright @YEAR@ Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

package @VERSION@

import (
	"context"
	"fmt"

	"github.com/GoogleCloudPlatform/k8s-config-connector/apis/common/parent"
	"sigs.k8s.io/controller-runtime/pkg/client"
)

// @RESOURCE@Identity identifies a @RESOURCE@ in GCP.
// Format: @NAME_FORMAT@
type @RESOURCE@Identity struct {
	parent *@RESOURCE@Parent
	id     string
}

func (i *@RESOURCE@Identity) String() string {
	// TODO: Adjust format to match the actual GCP API
	return i.parent.String() + "/@RESOURCE@s/" + i.id
}

func (i *@RESOURCE@Identity) Parent() *@RESOURCE@Parent {
	return i.parent
}

func (i *@RESOURCE@Identity) ID() string {
	return i.id
}

type @RESOURCE@Parent struct {
	@PARENT_FIELDS@
}

func (i *@RESOURCE@Parent) String() string {
	@PARENT_STRING@
}

// New@RESOURCE@Identity builds a @RESOURCE@Identity from a KRM object.
func New@RESOURCE@Identity(ctx context.Context, reader client.Reader, obj *@RESOURCE@) (*@RESOURCE@Identity, error) {
	projectRef := obj.Spec.ProjectRef
	if projectRef == nil {
		return nil, fmt.Errorf("spec.projectRef is required")
	}

	projectID, err := parent.ResolveProjectID(ctx, reader, projectRef)
	if err != nil {
		return nil, err
	}
@LOCATION_CHECK@
	resourceID := valueOf(obj.Spec.ResourceID)
	if resourceID == "" {
		resourceID = obj.GetName()
	}
	if resourceID == "" {
		return nil, fmt.Errorf("cannot resolve resource ID")
	}

	return &@RESOURCE@Identity{
		parent: &@RESOURCE@Parent{
			ProjectID: projectID,@LOCATION_FIELD@
		},
		id: resourceID,
	}, nil
}

func valueOf[T any](t *T) T {
	var zeroVal T
	if t == nil {
		return zeroVal
	}
	return *t
}
"#;

const CONTROLLER_TEMPLATE: &str = r#"// Copyright @YEAR@ Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

package @SERVICE@

import (
	"context"
	"fmt"

	krm "github.com/GoogleCloudPlatform/k8s-config-connector/apis/@SERVICE@/@VERSION@"
	"github.com/GoogleCloudPlatform/k8s-config-connector/pkg/config"
	"github.com/GoogleCloudPlatform/k8s-config-connector/pkg/controller/direct"
	"github.com/GoogleCloudPlatform/k8s-config-connector/pkg/controller/direct/directbase"
	"github.com/GoogleCloudPlatform/k8s-config-connector/pkg/controller/direct/registry"

	"k8s.io/apimachinery/pkg/apis/meta/v1/unstructured"
	"k8s.io/apimachinery/pkg/runtime"
	"k8s.io/klog/v2"
	"sigs.k8s.io/controller-runtime/pkg/client"
)

func init() {
	registry.RegisterModel(krm.@GVK@GVK, New@RESOURCE@Model)
}

func New@RESOURCE@Model(ctx context.Context, config *config.ControllerConfig) (directbase.Model, error) {
	return &@RESOURCE@Model{config: *config}, nil
}

var _ directbase.Model = &@RESOURCE@Model{}

type @RESOURCE@Model struct {
	config config.ControllerConfig
}

func (m *@RESOURCE@Model) AdapterForObject(ctx context.Context, reader client.Reader, u *unstructured.Unstructured) (directbase.Adapter, error) {
	obj := &krm.@GVK@{}
	if err := runtime.DefaultUnstructuredConverter.FromUnstructured(u.Object, &obj); err != nil {
		return nil, fmt.Errorf("error converting to %T: %w", obj, err)
	}

	id, err := krm.New@RESOURCE@Identity(ctx, reader, obj)
	if err != nil {
		return nil, err
	}

	// TODO: Construct the GCP client here
	return &@RESOURCE@Adapter{
		id:      id,
		desired: obj,
		reader:  reader,
	}, nil
}

func (m *@RESOURCE@Model) AdapterForURL(ctx context.Context, url string) (directbase.Adapter, error) {
	// TODO: Support URLs
	return nil, nil
}

type @RESOURCE@Adapter struct {
	id      *krm.@RESOURCE@Identity
	desired *krm.@GVK@
	reader  client.Reader
}

var _ directbase.Adapter = &@RESOURCE@Adapter{}

// Find retrieves the GCP resource.
func (a *@RESOURCE@Adapter) Find(ctx context.Context) (bool, error) {
	log := klog.FromContext(ctx)
	log.V(2).Info("getting @RESOURCE@", "name", a.id)

	// TODO: Call Get@PROTO_MESSAGE@ and store the result on the adapter
	return false, nil
}

func (a *@RESOURCE@Adapter) resolveReferences(ctx context.Context) error {
	// TODO: Implement reference resolution if needed
	return nil
}

// Create creates the resource in GCP.
func (a *@RESOURCE@Adapter) Create(ctx context.Context, createOp *directbase.CreateOperation) error {
	log := klog.FromContext(ctx)
	log.V(2).Info("creating @RESOURCE@", "name", a.id)

	if err := a.resolveReferences(ctx); err != nil {
		return err
	}

	mapCtx := &direct.MapContext{}
	desired := a.desired.DeepCopy()
	resource := @RESOURCE@Spec_ToProto(mapCtx, &desired.Spec)
	if mapCtx.Err() != nil {
		return mapCtx.Err()
	}

	// TODO: Call Create@PROTO_MESSAGE@, wait for the LRO, then update status
	_ = resource
	return fmt.Errorf("@RESOURCE@ Create not yet implemented")
}

// Update updates the resource in GCP.
func (a *@RESOURCE@Adapter) Update(ctx context.Context, updateOp *directbase.UpdateOperation) error {
	log := klog.FromContext(ctx)
	log.V(2).Info("updating @RESOURCE@", "name", a.id)

	if err := a.resolveReferences(ctx); err != nil {
		return err
	}

	mapCtx := &direct.MapContext{}
	desired := a.desired.DeepCopy()
	resource := @RESOURCE@Spec_ToProto(mapCtx, &desired.Spec)
	if mapCtx.Err() != nil {
		return mapCtx.Err()
	}

	// TODO: Build the field mask, call Update@PROTO_MESSAGE@, then update status
	_ = resource
	return fmt.Errorf("@RESOURCE@ Update not yet implemented")
}

// Export maps the GCP object to a Config Connector resource spec.
func (a *@RESOURCE@Adapter) Export(ctx context.Context) (*unstructured.Unstructured, error) {
	// TODO: Map a.actual back to KRM once Find stores it
	return nil, fmt.Errorf("@RESOURCE@ Export not yet implemented")
}

// Delete deletes the resource from GCP.
func (a *@RESOURCE@Adapter) Delete(ctx context.Context, deleteOp *directbase.DeleteOperation) (bool, error) {
	log := klog.FromContext(ctx)
	log.V(2).Info("deleting @RESOURCE@", "name", a.id)

	// TODO: Call Delete@PROTO_MESSAGE@ and wait for the LRO
	return true, nil
}
"#;

const MOCKGCP_TEMPLATE: &str = r#"// Copyright @YEAR@ Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

package mock@SERVICE@

import (
	"context"
	"fmt"
	"strings"
	"time"

	"google.golang.org/grpc/codes"
	"google.golang.org/grpc/status"
	"google.golang.org/protobuf/proto"
	"google.golang.org/protobuf/types/known/emptypb"
	"google.golang.org/protobuf/types/known/timestamppb"

	"github.com/GoogleCloudPlatform/k8s-config-connector/mockgcp/common/projects"
	pb "@PROTO_PACKAGE@pb"
	"github.com/GoogleCloudPlatform/k8s-config-connector/mockgcp/pkg/storage"
	longrunningpb "google.golang.org/genproto/googleapis/longrunning"
)

func (s *@SERVER@) Get@RESOURCE@(ctx context.Context, req *pb.Get@RESOURCE@Request) (*pb.@RESOURCE@, error) {
	name, err := s.parse@RESOURCE@Name(req.Name)
	if err != nil {
		return nil, err
	}

	fqn := name.String()

	obj := &pb.@RESOURCE@{}
	if err := s.storage.Get(ctx, fqn, obj); err != nil {
		if status.Code(err) == codes.NotFound {
			return nil, status.Errorf(codes.NotFound, "Resource '%s' was not found", fqn)
		}
		return nil, err
	}

	return obj, nil
}

func (s *@SERVER@) Create@RESOURCE@(ctx context.Context, req *pb.Create@RESOURCE@Request) (*longrunningpb.Operation, error) {
	reqName := req.Parent + "/@RESOURCE_LOWER@s/" + req.@RESOURCE@Id
	name, err := s.parse@RESOURCE@Name(reqName)
	if err != nil {
		return nil, err
	}

	fqn := name.String()
	now := time.Now()

	obj := proto.Clone(req.@RESOURCE@).(*pb.@RESOURCE@)
	obj.Name = fqn

	if err := s.storage.Create(ctx, fqn, obj); err != nil {
		return nil, err
	}

	lroPrefix := fmt.Sprintf("projects/%s/locations/%s", name.Project.ID, name.Location)
	lroMetadata := &pb.OperationMetadata{
		CreateTime: timestamppb.New(now),
		EndTime:    timestamppb.New(now),
		Target:     fqn,
		Verb:       "create",
		ApiVersion: "v1",
	}

	return s.operations.StartLRO(ctx, lroPrefix, lroMetadata, func() (proto.Message, error) {
		return proto.Clone(obj).(*pb.@RESOURCE@), nil
	})
}

func (s *@SERVER@) Update@RESOURCE@(ctx context.Context, req *pb.Update@RESOURCE@Request) (*longrunningpb.Operation, error) {
	name, err := s.parse@RESOURCE@Name(req.@RESOURCE@.Name)
	if err != nil {
		return nil, err
	}

	fqn := name.String()

	existing := &pb.@RESOURCE@{}
	if err := s.storage.Get(ctx, fqn, existing); err != nil {
		return nil, err
	}

	now := time.Now()

	updated := proto.Clone(req.@RESOURCE@).(*pb.@RESOURCE@)
	updated.Name = fqn

	if err := s.storage.Update(ctx, fqn, updated); err != nil {
		return nil, err
	}

	lroPrefix := fmt.Sprintf("projects/%s/locations/%s", name.Project.ID, name.Location)
	lroMetadata := &pb.OperationMetadata{
		CreateTime: timestamppb.New(now),
		EndTime:    timestamppb.New(now),
		Target:     fqn,
		Verb:       "update",
		ApiVersion: "v1",
	}

	return s.operations.StartLRO(ctx, lroPrefix, lroMetadata, func() (proto.Message, error) {
		return proto.Clone(updated).(*pb.@RESOURCE@), nil
	})
}

func (s *@SERVER@) Delete@RESOURCE@(ctx context.Context, req *pb.Delete@RESOURCE@Request) (*longrunningpb.Operation, error) {
	name, err := s.parse@RESOURCE@Name(req.Name)
	if err != nil {
		return nil, err
	}

	fqn := name.String()

	deleted := &pb.@RESOURCE@{}
	if err := s.storage.Delete(ctx, fqn, deleted); err != nil {
		return nil, err
	}

	now := time.Now()
	lroMetadata := &pb.OperationMetadata{
		CreateTime: timestamppb.New(now),
		EndTime:    timestamppb.New(now),
		Target:     fqn,
		Verb:       "delete",
		ApiVersion: "v1",
	}

	lroPrefix := fmt.Sprintf("projects/%s/locations/%s", name.Project.ID, name.Location)
	return s.operations.DoneLRO(ctx, lroPrefix, lroMetadata, &emptypb.Empty{})
}

type @RESOURCE@Name struct {
	Project  *projects.ProjectData
	Location string
	Name     string
}

func (n *@RESOURCE@Name) String() string {
	// Format: @NAME_FORMAT@
	return fmt.Sprintf("projects/%s/locations/%s/@RESOURCE_LOWER@s/%s", n.Project.ID, n.Location, n.Name)
}

// parse@RESOURCE@Name parses a string into a @RESOURCE@Name.
// Expected form: @NAME_FORMAT@
func (s *@SERVER@) parse@RESOURCE@Name(name string) (*@RESOURCE@Name, error) {
	tokens := strings.Split(name, "/")

	// TODO: Adjust parsing based on the actual resource name format
	if len(tokens) == 6 && tokens[0] == "projects" && tokens[2] == "locations" && tokens[4] == "@RESOURCE_LOWER@s" {
		project, err := s.Projects.GetProjectByID(tokens[1])
		if err != nil {
			return nil, err
		}

		return &@RESOURCE@Name{
			Project:  project,
			Location: tokens[3],
			Name:     tokens[5],
		}, nil
	}

	return nil, status.Errorf(codes.InvalidArgument, "name %q is not valid", name)
}
"#;
